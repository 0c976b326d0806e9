//! Build script for linking platform-specific texture sharing frameworks.
//!
//! This handles:
//! - macOS: Syphon.framework for GPU texture sharing
//! - Windows: nothing to link; SpoutLibrary.dll is loaded at runtime

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    #[cfg(target_os = "macos")]
    {
        // Link Syphon.framework from vendor/ next to the crate, or from a
        // path given via SYPHON_FRAMEWORK_DIR.
        let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap();
        let framework_dir = std::env::var("SYPHON_FRAMEWORK_DIR")
            .unwrap_or_else(|_| format!("{}/vendor", manifest_dir));
        let syphon_path = format!("{}/Syphon.framework", framework_dir);

        if std::path::Path::new(&syphon_path).exists() {
            println!("cargo:rustc-link-search=framework={}", framework_dir);
            println!("cargo:rustc-link-lib=framework=Syphon");
            // Set rpath so the framework can be found at runtime
            println!("cargo:rustc-link-arg=-Wl,-rpath,@executable_path/../Frameworks");
            println!("cargo:rustc-link-arg=-Wl,-rpath,{}", framework_dir);
        } else {
            println!(
                "cargo:warning=Syphon.framework not found at {}. Texture sharing will report unavailable at runtime.",
                syphon_path
            );
        }

        // CGLGetCurrentContext and the frameworks Syphon depends on
        println!("cargo:rustc-link-lib=framework=OpenGL");
        println!("cargo:rustc-link-lib=framework=IOSurface");
        println!("cargo:rustc-link-lib=framework=CoreGraphics");
        println!("cargo:rustc-link-lib=framework=Foundation");
    }
}
