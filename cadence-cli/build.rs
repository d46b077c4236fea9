use std::path::Path;
use std::process::Command;

const SHA_VAR: &str = "CADENCE_BUILD_SHA";

fn git_describe(repo_root: &Path) -> Option<String> {
    let out = Command::new("git")
        .arg("-C")
        .arg(repo_root)
        .args(["describe", "--always", "--dirty", "--abbrev=8"])
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    let rev = String::from_utf8(out.stdout).ok()?.trim().to_owned();
    (!rev.is_empty()).then_some(rev)
}

fn main() {
    println!("cargo:rerun-if-env-changed={SHA_VAR}");

    // Trees without git metadata can pass the revision in through the environment.
    let rev = match std::env::var(SHA_VAR) {
        Ok(v) if !v.trim().is_empty() => v.trim().to_owned(),
        _ => {
            let manifest_dir = std::env::var_os("CARGO_MANIFEST_DIR").unwrap_or_else(|| ".".into());
            let repo_root = Path::new(&manifest_dir).join("..");
            let git_dir = repo_root.join(".git");
            if git_dir.exists() {
                println!("cargo:rerun-if-changed={}", git_dir.join("HEAD").display());
                println!("cargo:rerun-if-changed={}", git_dir.join("index").display());
            }
            git_describe(&repo_root).unwrap_or_else(|| "unknown".to_owned())
        }
    };

    println!("cargo:rustc-env={SHA_VAR}={rev}");
}
