//! OS-provided machine identifier for the telemetry install id.
//! Best effort: readable by normal user processes, no extra permissions.

/// Returns the OS machine ID if available.
pub fn get_machine_id() -> Option<String> {
    #[cfg(target_os = "linux")]
    return get_machine_id_linux();

    #[cfg(target_os = "windows")]
    return get_machine_id_windows();

    #[cfg(target_os = "macos")]
    return get_machine_id_macos();

    #[cfg(not(any(target_os = "linux", target_os = "windows", target_os = "macos")))]
    None
}

#[cfg(target_os = "linux")]
fn get_machine_id_linux() -> Option<String> {
    std::fs::read_to_string("/etc/machine-id")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(target_os = "windows")]
fn get_machine_id_windows() -> Option<String> {
    use winreg::enums::HKEY_LOCAL_MACHINE;
    use winreg::RegKey;

    let key = RegKey::predef(HKEY_LOCAL_MACHINE)
        .open_subkey(r"SOFTWARE\Microsoft\Cryptography")
        .ok()?;
    let guid: String = key.get_value("MachineGuid").ok()?;
    let guid = guid.trim();
    if guid.is_empty() {
        return None;
    }
    Some(guid.to_string())
}

#[cfg(target_os = "macos")]
fn get_machine_id_macos() -> Option<String> {
    use std::process::Command;

    let out = Command::new("ioreg")
        .args(["-rd1", "-c", "IOPlatformExpertDevice"])
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    // Line like: "IOPlatformUUID" = "XXXXXXXX-XXXX-..." — take the value quotes.
    let s = String::from_utf8_lossy(&out.stdout);
    s.lines()
        .find(|line| line.contains("IOPlatformUUID"))
        .and_then(|line| {
            let mut quoted = line.split('"').skip(1).step_by(2);
            let _key = quoted.next()?;
            quoted.next().map(|v| v.trim().to_string())
        })
        .filter(|v| !v.is_empty() && v.contains('-'))
}
