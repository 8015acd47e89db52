//! Build script for OUTGUARD
//!
//! Embeds build-time information (git commit, dirty status, build timestamp)
//! so the CLI can report exactly which build is mutating firewall state.

fn main() {
    shadow_rs::ShadowBuilder::builder()
        .build()
        .expect("Failed to generate build info");
}
