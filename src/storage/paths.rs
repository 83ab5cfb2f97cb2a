/// Normalizes a store path: single leading slash, no empty segments, no trailing slash.
pub fn clean(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    format!("/{}", segments.join("/"))
}

/// Parent directory of a cleaned path. The parent of `/` is `/`.
pub fn parent(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) | None => "/",
        Some(idx) => &path[..idx],
    }
}

/// Joins a directory and a child name.
pub fn join(dir: &str, name: &str) -> String {
    if dir == "/" {
        format!("/{}", name)
    } else {
        format!("{}/{}", dir, name)
    }
}

/// Deterministic store layout of one product.
///
/// Every entity path embeds its id or token, so a directory listing
/// enumerates all entities of a kind without a separate index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopologyPaths {
    base: String,
}

impl TopologyPaths {
    pub fn new(root: &str, product_name: &str) -> Self {
        Self {
            base: clean(&format!("{}/{}", root, product_name)),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn slot_dir(&self) -> String {
        join(&self.base, "slots")
    }

    pub fn slot_path(&self, sid: u32) -> String {
        join(&self.slot_dir(), &format!("slot-{:04}", sid))
    }

    pub fn group_dir(&self) -> String {
        join(&self.base, "group")
    }

    pub fn group_path(&self, gid: u32) -> String {
        join(&self.group_dir(), &format!("group-{:04}", gid))
    }

    pub fn proxy_dir(&self) -> String {
        join(&self.base, "proxy")
    }

    pub fn proxy_path(&self, token: &str) -> String {
        join(&self.proxy_dir(), &format!("proxy-{}", token))
    }

    pub fn lock_path(&self) -> String {
        join(&self.base, "topology")
    }

    /// Group id named by a listed path, if it is exactly `group_path(id)`.
    pub fn group_id_of(&self, path: &str) -> Option<u32> {
        let gid = file_name(path)?.strip_prefix("group-")?.parse().ok()?;
        (self.group_path(gid) == path).then_some(gid)
    }

    /// Proxy token named by a listed path, if it is exactly `proxy_path(token)`.
    pub fn proxy_token_of(&self, path: &str) -> Option<String> {
        let token = file_name(path)?.strip_prefix("proxy-")?;
        (valid_token(token) && self.proxy_path(token) == path).then(|| token.to_string())
    }
}

fn file_name(path: &str) -> Option<&str> {
    path.rsplit('/').next().filter(|name| !name.is_empty())
}

/// A proxy token must map to exactly one direct child of the proxy directory.
pub fn valid_token(token: &str) -> bool {
    !token.is_empty() && !token.contains('/') && !token.starts_with('.')
}
