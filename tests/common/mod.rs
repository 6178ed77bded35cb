//! Shared fixtures for integration tests

#![allow(dead_code)]

use git2::{Commit, Oid, Repository, Signature, Time};
use tempfile::TempDir;

use mcp_git::config::ServerConfig;
use mcp_git::mcp::McpServer;

/// Throwaway repository whose HEAD is `refs/heads/main`.
pub struct FixtureRepo {
    pub dir: TempDir,
    pub repo: Repository,
    clock: std::cell::Cell<i64>,
}

impl FixtureRepo {
    pub fn init() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = Repository::init(dir.path()).expect("git init");
        repo.set_head("refs/heads/main").expect("set HEAD");
        Self {
            dir,
            repo,
            clock: std::cell::Cell::new(1_704_067_200),
        }
    }

    pub fn path_str(&self) -> String {
        self.dir.path().to_string_lossy().to_string()
    }

    /// Commits on `branch`, one minute after the previous fixture commit.
    pub fn commit_on(&self, branch: &str, author: &str, email: &str, message: &str) -> Oid {
        let when = self.clock.get() + 60;
        self.clock.set(when);
        let sig = Signature::new(author, email, &Time::new(when, 0)).expect("signature");

        let tree_id = self.repo.treebuilder(None).unwrap().write().unwrap();
        let tree = self.repo.find_tree(tree_id).unwrap();

        let refname = format!("refs/heads/{}", branch);
        let parent: Option<Commit> = self
            .repo
            .find_reference(&refname)
            .ok()
            .and_then(|r| r.peel_to_commit().ok());
        let parents: Vec<&Commit> = parent.iter().collect();

        self.repo
            .commit(Some(&refname), &sig, &sig, message, &tree, &parents)
            .expect("commit")
    }

    pub fn commit(&self, author: &str, message: &str) -> Oid {
        let email = format!("{}@example.com", author.to_lowercase());
        self.commit_on("main", author, &email, message)
    }

    /// Creates `name` pointing at the current tip of `main`.
    pub fn branch(&self, name: &str) {
        let tip = self
            .repo
            .find_reference("refs/heads/main")
            .and_then(|r| r.peel_to_commit())
            .expect("main tip");
        self.repo.branch(name, &tip, false).expect("branch");
    }
}

pub fn server() -> McpServer {
    McpServer::new(ServerConfig::default()).expect("server")
}

pub fn server_with(config: ServerConfig) -> McpServer {
    McpServer::new(config).expect("server")
}
