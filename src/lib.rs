//! Compact bitboard chess position: decodes and encodes [Forsyth-Edwards
//! Notation] (FEN) and applies one move at a time to transition
//! deterministically from one position to the next.
//!
//! Move legality, move generation and search are not part of this crate: the
//! [`chess::position::Position`] trusts the [`chess::core::Move`] it is given.
//!
//! [Forsyth-Edwards Notation]: https://www.chessprogramming.org/Forsyth-Edwards_Notation

// Rustdoc lints.
#![warn(
    rustdoc::missing_crate_level_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::invalid_codeblock_attributes,
    rustdoc::invalid_html_tags,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::bare_urls
)]

pub mod chess;
pub mod session;

use shadow_rs::shadow;

shadow!(build);

/// Cargo profile the crate was built with. Produced by `build.rs`.
const PROFILE: &str = include_str!(concat!(env!("OUT_DIR"), "/profile"));

/// Returns the full crate version that can be used to identify how it was
/// built in the first place.
#[must_use]
pub fn version() -> String {
    format!(
        "{} (commit {}, branch {})",
        build::PKG_VERSION,
        build::SHORT_COMMIT,
        build::BRANCH
    )
}

/// Prints information about the build type and whether the build is clean.
pub fn print_binary_info() {
    println!("{} {}", build::PROJECT_NAME, version());
    println!("Release build: {}", !shadow_rs::is_debug());
    println!("Profile: {PROFILE}");
    if !shadow_rs::git_clean() {
        println!("Warning: built with uncommitted changes");
    }
}
