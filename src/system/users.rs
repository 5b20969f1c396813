use std::collections::HashMap;
use std::path::Path;

use tracing::warn;

pub const DEFAULT_PASSWD_PATH: &str = "/etc/passwd";

/// uid → login name, read once from a passwd-format file.
#[derive(Debug, Clone, Default)]
pub struct UserTable {
    names: HashMap<u32, String>,
}

impl UserTable {
    /// Loads the table; an unreadable file yields an empty table so that
    /// users are shown by uid instead.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot read user database");
                Self::default()
            }
        }
    }

    pub fn parse(contents: &str) -> Self {
        let names = contents
            .lines()
            .filter(|line| !line.starts_with('#'))
            .filter_map(|line| {
                let mut fields = line.split(':');
                let name = fields.next()?;
                let uid = fields.nth(1)?.parse().ok()?;
                (!name.is_empty()).then(|| (uid, name.to_string()))
            })
            .collect();
        Self { names }
    }

    pub fn name(&self, uid: u32) -> String {
        self.names
            .get(&uid)
            .cloned()
            .unwrap_or_else(|| uid.to_string())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
