use std::env;

fn main() {
    // Pick the default log level from the build profile
    let profile = env::var("PROFILE").unwrap_or_else(|_| "debug".to_string());
    // Custom profiles inheriting from release report PROFILE=release, so debug info marks profiling
    let debug_info = env::var("DEBUG").map(|v| v == "true").unwrap_or(false);

    println!("cargo:rustc-check-cfg=cfg(log_profile, values(\"release\", \"profiling\", \"debug\"))");

    match (profile.as_str(), debug_info) {
        ("release", true) => {
            println!("cargo:rustc-cfg=log_profile=\"profiling\"");
        }
        ("release", false) => {
            // Errors only in release builds
            println!("cargo:rustc-cfg=log_profile=\"release\"");
        }
        _ => {
            println!("cargo:rustc-cfg=log_profile=\"debug\"");
        }
    }

    println!("cargo:rerun-if-env-changed=PROFILE");
    println!("cargo:rerun-if-env-changed=DEBUG");
}
