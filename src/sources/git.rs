//! Git source - the Qt superproject checkout.
//!
//! The checkout follows the release recipe: clone, switch to the release
//! branch so `init-repository` knows the module list, initialise only the
//! selected modules, switch to the release tag and update the initialised
//! submodules.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use git2::build::CheckoutBuilder;
use git2::Repository;
use url::Url;

use crate::builder::plan::SourceRequest;
use crate::core::{ModuleRequirement, PlanError};
use crate::sources::Source;
use crate::util::fs::make_executable;
use crate::util::process::{find_executable, ProcessBuilder};

/// A git checkout of the package sources.
pub struct GitCheckout {
    /// Remote repository URL
    remote: Url,
}

impl GitCheckout {
    /// Create a checkout of `repository`.
    pub fn new(repository: &str) -> Result<Self> {
        let remote = Url::parse(repository)
            .with_context(|| format!("invalid repository URL: {}", repository))?;
        Ok(GitCheckout { remote })
    }

    /// Clone into `dest`, or open and fetch an existing checkout.
    fn clone_or_open(&self, dest: &Path) -> Result<Repository> {
        let repo = if dest.join(".git").exists() {
            tracing::info!("Updating {}", self.remote);
            let repo = Repository::open(dest)
                .with_context(|| format!("failed to open git repository: {}", dest.display()))?;
            {
                let mut remote = repo.find_remote("origin")?;
                remote
                    .fetch(&["refs/heads/*:refs/remotes/origin/*"], None, None)
                    .with_context(|| format!("failed to fetch {}", self.remote))?;
            }
            repo
        } else {
            tracing::info!("Cloning {}", self.remote);
            if let Some(parent) = dest.parent() {
                crate::util::fs::ensure_dir(parent)?;
            }
            Repository::clone(self.remote.as_str(), dest)
                .with_context(|| format!("failed to clone {}", self.remote))?
        };

        {
            let mut remote = repo.find_remote("origin")?;
            remote
                .fetch(&["refs/tags/*:refs/tags/*"], None, None)
                .with_context(|| format!("failed to fetch tags from {}", self.remote))?;
        }

        Ok(repo)
    }

    /// Check out `refname` detached, discarding local changes.
    fn checkout(&self, repo: &Repository, refname: &str) -> Result<git2::Oid> {
        let commit = repo
            .find_reference(refname)
            .and_then(|r| r.peel_to_commit())
            .with_context(|| format!("`{}` not found in {}", refname, self.remote))?;

        repo.checkout_tree(commit.as_object(), Some(CheckoutBuilder::new().force()))
            .with_context(|| format!("failed to check out {}", refname))?;
        repo.set_head_detached(commit.id())?;

        Ok(commit.id())
    }

    /// Run `init-repository` for the selected modules.
    fn init_modules(&self, dest: &Path, modules: &ModuleRequirement) -> Result<()> {
        let perl = find_executable("perl").ok_or_else(|| PlanError::ExternalToolNotFound {
            tool: "perl".to_string(),
        })?;

        ProcessBuilder::new(perl)
            .arg("init-repository")
            .arg("--no-update")
            .arg(format!("--module-subset={}", modules.subset_arg()))
            .cwd(dest)
            .status_and_check()
    }

    /// Update the submodules `init-repository` selected.
    fn update_submodules(&self, repo: &Repository, modules: &ModuleRequirement) -> Result<()> {
        for mut submodule in repo.submodules()? {
            let name = submodule.name().unwrap_or_default().to_string();
            if !modules.contains(&name) {
                continue;
            }
            tracing::info!("Updating submodule {}", name);
            submodule
                .update(true, None)
                .with_context(|| format!("failed to update submodule {}", name))?;
        }
        Ok(())
    }
}

impl Source for GitCheckout {
    fn name(&self) -> &str {
        "git"
    }

    fn is_ready(&self, request: &SourceRequest, modules: &ModuleRequirement) -> bool {
        let Ok(repo) = Repository::open(&request.source_dir) else {
            return false;
        };
        let tagged = repo
            .find_reference(&format!("refs/tags/{}", request.tag))
            .and_then(|r| r.peel_to_commit())
            .map(|c| c.id());
        let head = repo.head().and_then(|h| h.peel_to_commit()).map(|c| c.id());

        if !matches!((tagged, head), (Ok(a), Ok(b)) if a == b) {
            return false;
        }

        // Every selected module must be an initialised submodule.
        modules.iter().all(|name| {
            let initialised = repo
                .find_submodule(name)
                .map(|sub| sub.workdir_id().is_some())
                .unwrap_or(false);
            if !initialised {
                tracing::debug!("module {} is not checked out", name);
            }
            initialised
        })
    }

    fn fetch(&mut self, request: &SourceRequest, modules: &ModuleRequirement) -> Result<PathBuf> {
        let dest = &request.source_dir;
        let repo = self.clone_or_open(dest)?;

        self.checkout(&repo, &format!("refs/remotes/origin/{}", request.branch))?;
        self.init_modules(dest, modules)?;

        let oid = self.checkout(&repo, &format!("refs/tags/{}", request.tag))?;

        self.update_submodules(&repo, modules)?;

        if !cfg!(windows) {
            make_executable(&dest.join("configure"))?;
        }

        tracing::info!("Checked out {} at {}", request.tag, oid);
        Ok(dest.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::linux_modules;
    use git2::Signature;
    use tempfile::TempDir;

    fn upstream(dir: &Path) -> git2::Oid {
        let repo = Repository::init(dir).unwrap();
        std::fs::write(dir.join("configure"), "#!/bin/sh\n").unwrap();

        let mut index = repo.index().unwrap();
        index.add_path(Path::new("configure")).unwrap();
        index.write().unwrap();
        let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
        let sig = Signature::now("qtpack", "qtpack@example.com").unwrap();
        let oid = repo
            .commit(Some("HEAD"), &sig, &sig, "initial", &tree, &[])
            .unwrap();

        let commit = repo.find_commit(oid).unwrap();
        repo.branch("5.9", &commit, false).unwrap();
        repo.tag_lightweight("v5.9.2", commit.as_object(), false)
            .unwrap();
        oid
    }

    #[test]
    fn test_invalid_url() {
        assert!(GitCheckout::new("not a url").is_err());
    }

    #[test]
    fn test_clone_and_checkout_tag() {
        let tmp = TempDir::new().unwrap();
        let origin = tmp.path().join("origin");
        std::fs::create_dir_all(&origin).unwrap();
        let oid = upstream(&origin);

        let url = Url::from_file_path(&origin).unwrap();
        let checkout = GitCheckout::new(url.as_str()).unwrap();
        let dest = tmp.path().join("qt5");

        let repo = checkout.clone_or_open(&dest).unwrap();
        assert_eq!(checkout.checkout(&repo, "refs/remotes/origin/5.9").unwrap(), oid);
        assert_eq!(checkout.checkout(&repo, "refs/tags/v5.9.2").unwrap(), oid);
        assert!(dest.join("configure").exists());

        let request = SourceRequest {
            repository: url.to_string(),
            branch: "5.9".to_string(),
            tag: "v5.9.2".to_string(),
            source_dir: dest.clone(),
        };
        // The tag is checked out but no module has been initialised.
        assert!(!checkout.is_ready(&request, &linux_modules(&[("x11extras", "False")])));

        // A second call reuses the existing checkout.
        assert!(checkout.clone_or_open(&dest).is_ok());
    }

    #[test]
    fn test_missing_ref() {
        let tmp = TempDir::new().unwrap();
        let origin = tmp.path().join("origin");
        std::fs::create_dir_all(&origin).unwrap();
        upstream(&origin);

        let url = Url::from_file_path(&origin).unwrap();
        let checkout = GitCheckout::new(url.as_str()).unwrap();
        let repo = checkout.clone_or_open(&tmp.path().join("qt5")).unwrap();

        let err = checkout.checkout(&repo, "refs/tags/v9.9.9").unwrap_err();
        assert!(err.to_string().contains("v9.9.9"));
    }

    #[test]
    fn test_not_ready_without_checkout() {
        let tmp = TempDir::new().unwrap();
        let checkout = GitCheckout::new("http://code.qt.io/qt/qt5.git").unwrap();
        let request = SourceRequest {
            repository: "http://code.qt.io/qt/qt5.git".to_string(),
            branch: "5.9".to_string(),
            tag: "v5.9.2".to_string(),
            source_dir: tmp.path().join("qt5"),
        };
        assert!(!checkout.is_ready(&request, &linux_modules(&[])));
    }

    #[test]
    fn test_ready_requires_every_module() {
        let tmp = TempDir::new().unwrap();
        let origin = tmp.path().join("origin");
        let base_origin = tmp.path().join("qtbase-origin");
        std::fs::create_dir_all(&origin).unwrap();
        std::fs::create_dir_all(&base_origin).unwrap();
        upstream(&origin);
        upstream(&base_origin);

        let url = Url::from_file_path(&origin).unwrap();
        let checkout = GitCheckout::new(url.as_str()).unwrap();
        let dest = tmp.path().join("qt5");
        let repo = checkout.clone_or_open(&dest).unwrap();
        checkout.checkout(&repo, "refs/tags/v5.9.2").unwrap();

        // Initialise qtbase only, as a checkout made with svg=False would.
        let base_url = Url::from_file_path(&base_origin).unwrap();
        let mut base = repo
            .submodule(base_url.as_str(), Path::new("qtbase"), true)
            .unwrap();
        base.clone(None).unwrap();
        base.add_finalize().unwrap();

        let request = SourceRequest {
            repository: url.to_string(),
            branch: "5.9".to_string(),
            tag: "v5.9.2".to_string(),
            source_dir: dest.clone(),
        };

        let base_only = linux_modules(&[("x11extras", "False")]);
        assert_eq!(base_only.as_slice(), &["qtbase"]);
        assert!(checkout.is_ready(&request, &base_only));

        let with_svg = linux_modules(&[("x11extras", "False"), ("svg", "True")]);
        assert!(!checkout.is_ready(&request, &with_svg));
    }
}
