use sysinfo::{CpuExt, System, SystemExt};

use crate::meta::SystemInfo;

fn get_rustc_version() -> Option<String> {
    let vmeta = rustc_version::version_meta().ok()?;
    Some(format!(
        "{} ({})",
        vmeta.semver,
        format!("{:?}", vmeta.channel).to_lowercase()
    ))
}

pub fn get_current_system_info() -> SystemInfo {
    let mut sys = System::new();
    sys.refresh_cpu();
    sys.refresh_memory();
    const UNKNOWN: &str = "<unknown>";
    SystemInfo {
        host: sys.host_name().unwrap_or(UNKNOWN.to_string()),
        os: sys.long_os_version().unwrap_or(UNKNOWN.to_string()),
        arch: std::env::consts::ARCH.to_string(),
        cpu_model: sys.global_cpu_info().brand().to_owned(),
        memory_size: sys.total_memory() as usize,
        rustc: get_rustc_version().unwrap_or_else(|| UNKNOWN.to_string()),
    }
}
