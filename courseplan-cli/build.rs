use std::env;
use std::path::Path;
use std::process::Command;

const SHA_VAR: &str = "COURSEPLAN_BUILD_SHA";

/// `git describe` of the workspace, e.g. "3f2a9c1" or "3f2a9c1-dirty".
fn git_describe(workspace: &Path) -> Option<String> {
    let out = Command::new("git")
        .arg("-C")
        .arg(workspace)
        .args(["describe", "--always", "--dirty", "--abbrev=7"])
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    let sha = String::from_utf8(out.stdout).ok()?;
    let sha = sha.trim();
    (!sha.is_empty()).then(|| sha.to_string())
}

fn main() {
    println!("cargo:rerun-if-env-changed={SHA_VAR}");

    // Packaged sources have no .git; let the packager pass the revision in.
    let stamp = env::var(SHA_VAR).ok().filter(|s| !s.trim().is_empty()).or_else(|| {
        let manifest = env::var("CARGO_MANIFEST_DIR").ok()?;
        let workspace = Path::new(&manifest).parent()?.to_path_buf();
        println!("cargo:rerun-if-changed={}", workspace.join(".git/HEAD").display());
        git_describe(&workspace)
    });

    println!("cargo:rustc-env={SHA_VAR}={}", stamp.as_deref().unwrap_or("unknown"));
}
