//! Build script for coverpick
//!
//! Embeds version info into the Windows executable.

fn main() {
    // Only run on Windows builds
    #[cfg(target_os = "windows")]
    {
        windows_build();
    }
}

#[cfg(target_os = "windows")]
fn windows_build() {
    let mut res = winresource::WindowsResource::new();

    res.set("ProductName", "coverpick");
    res.set("FileDescription", "Album Art Picker");

    if let Err(e) = res.compile() {
        eprintln!("Failed to compile Windows resources: {}", e);
        // Version info is cosmetic, keep building
    }
}
