// src/filesystem/attributes.rs
use crate::error::{ExplorerError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    ReadOnly,
    Archive,
    Hidden,
    System,
}

impl Attribute {
    /// Code order: read-only, archive, hidden, system.
    pub const ALL: [Attribute; 4] = [Attribute::ReadOnly, Attribute::Archive, Attribute::Hidden, Attribute::System];

    pub fn flag(self) -> char {
        match self {
            Attribute::ReadOnly => 'r',
            Attribute::Archive => 'a',
            Attribute::Hidden => 'h',
            Attribute::System => 's',
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Attribute::ReadOnly => "Read-only",
            Attribute::Archive => "Archive",
            Attribute::Hidden => "Hidden",
            Attribute::System => "System",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    pub read_only: bool,
    pub archive: bool,
    pub hidden: bool,
    pub system: bool,
}

impl Attributes {
    pub fn get(&self, attr: Attribute) -> bool {
        match attr {
            Attribute::ReadOnly => self.read_only,
            Attribute::Archive => self.archive,
            Attribute::Hidden => self.hidden,
            Attribute::System => self.system,
        }
    }

    pub fn set(&mut self, attr: Attribute, value: bool) {
        match attr {
            Attribute::ReadOnly => self.read_only = value,
            Attribute::Archive => self.archive = value,
            Attribute::Hidden => self.hidden = value,
            Attribute::System => self.system = value,
        }
    }

    pub fn with(mut self, attr: Attribute, value: bool) -> Self {
        self.set(attr, value);
        self
    }

    /// Fixed four character code, e.g. `r-h-`.
    pub fn code(&self) -> String {
        Attribute::ALL
            .iter()
            .map(|&a| if self.get(a) { a.flag() } else { '-' })
            .collect()
    }

    fn ledger_part(&self) -> LedgerFlags {
        LedgerFlags { archive: self.archive, hidden: self.hidden, system: self.system }
    }
}

impl fmt::Display for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code())
    }
}

/// Where attribute flags live. The tree builder reads through it and the
/// session writes through it.
pub trait AttributeStore {
    fn query(&self, path: &Path) -> Result<Attributes>;
    fn apply(&mut self, path: &Path, attributes: Attributes) -> Result<()>;
    /// Drop whatever is remembered for `path` and everything below it.
    fn forget(&mut self, path: &Path) -> Result<()>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
struct LedgerFlags {
    #[serde(default)]
    archive: bool,
    #[serde(default)]
    hidden: bool,
    #[serde(default)]
    system: bool,
}

impl LedgerFlags {
    fn is_clear(&self) -> bool {
        !(self.archive || self.hidden || self.system)
    }
}

/// Read-only goes to the native permission bits. Where the platform has no
/// archive, hidden and system bits, those are kept in a JSON ledger keyed by
/// absolute path; on Windows the native bits are the only record.
#[derive(Debug, Default)]
pub struct LedgerAttributes {
    ledger_path: Option<PathBuf>,
    flags: BTreeMap<PathBuf, LedgerFlags>,
}

impl LedgerAttributes {
    /// Ledger that lives only as long as the process.
    pub fn in_memory() -> Self {
        LedgerAttributes::default()
    }

    /// Load the ledger at `path`; a missing file starts empty.
    pub fn load(path: PathBuf) -> Result<Self> {
        let flags = match fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(ExplorerError::io(&path, e)),
        };
        log::debug!("loaded {} ledger entries from {}", flags.len(), path.display());
        Ok(LedgerAttributes { ledger_path: Some(path), flags })
    }

    pub fn ledger_path(&self) -> Option<&Path> {
        self.ledger_path.as_deref()
    }

    fn persist(&self) -> Result<()> {
        let Some(ref path) = self.ledger_path else { return Ok(()) };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ExplorerError::io(parent, e))?;
        }
        let content = serde_json::to_string_pretty(&self.flags)?;
        fs::write(path, content).map_err(|e| ExplorerError::io(path, e))
    }
}

impl AttributeStore for LedgerAttributes {
    fn query(&self, path: &Path) -> Result<Attributes> {
        let metadata = fs::metadata(path).map_err(|e| ExplorerError::io(path, e))?;
        let stored = self.flags.get(path).copied().unwrap_or_default();

        let mut attributes = Attributes {
            read_only: metadata.permissions().readonly(),
            archive: stored.archive,
            hidden: stored.hidden,
            system: stored.system,
        };
        native::merge(path, &metadata, &mut attributes);
        Ok(attributes)
    }

    fn apply(&mut self, path: &Path, attributes: Attributes) -> Result<()> {
        let metadata = fs::metadata(path).map_err(|e| ExplorerError::io(path, e))?;
        let flags = if native::write(path, &metadata, attributes)? {
            LedgerFlags::default()
        } else {
            attributes.ledger_part()
        };

        if flags.is_clear() {
            self.flags.remove(path);
        } else {
            self.flags.insert(path.to_path_buf(), flags);
        }
        self.persist()
    }

    fn forget(&mut self, path: &Path) -> Result<()> {
        let before = self.flags.len();
        self.flags.retain(|key, _| !key.starts_with(path));
        if self.flags.len() != before {
            self.persist()?;
        }
        Ok(())
    }
}

/// Clear the read-only permission if it is set.
pub fn clear_read_only(path: &Path) -> Result<()> {
    let metadata = fs::symlink_metadata(path).map_err(|e| ExplorerError::io(path, e))?;
    if metadata.file_type().is_symlink() || !metadata.permissions().readonly() {
        return Ok(());
    }
    native::set_read_only(path, metadata.permissions(), false)
}

#[cfg(unix)]
mod native {
    use super::Attributes;
    use crate::error::{ExplorerError, Result};
    use std::fs::{self, Metadata, Permissions};
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;

    pub fn merge(path: &Path, _metadata: &Metadata, attributes: &mut Attributes) {
        let dotted = path
            .file_name()
            .map(|n| n.to_string_lossy().starts_with('.'))
            .unwrap_or(false);
        attributes.hidden |= dotted;
    }

    /// Only read-only is native here; returns false so the rest goes to the ledger.
    pub fn write(path: &Path, metadata: &Metadata, attributes: Attributes) -> Result<bool> {
        if metadata.permissions().readonly() != attributes.read_only {
            set_read_only(path, metadata.permissions(), attributes.read_only)?;
        }
        Ok(false)
    }

    pub fn set_read_only(path: &Path, mut permissions: Permissions, read_only: bool) -> Result<()> {
        if read_only {
            permissions.set_mode(permissions.mode() & !0o222);
        } else {
            // owner write only
            permissions.set_mode(permissions.mode() | 0o200);
        }
        fs::set_permissions(path, permissions).map_err(|e| ExplorerError::io(path, e))
    }
}

#[cfg(windows)]
mod native {
    use super::Attributes;
    use crate::error::{ExplorerError, Result};
    use std::fs::{self, Metadata, Permissions};
    use std::os::windows::ffi::OsStrExt;
    use std::os::windows::fs::MetadataExt;
    use std::path::Path;
    use windows_sys::Win32::Storage::FileSystem::{
        SetFileAttributesW, FILE_ATTRIBUTE_ARCHIVE, FILE_ATTRIBUTE_HIDDEN, FILE_ATTRIBUTE_NORMAL,
        FILE_ATTRIBUTE_NOT_CONTENT_INDEXED, FILE_ATTRIBUTE_OFFLINE, FILE_ATTRIBUTE_READONLY, FILE_ATTRIBUTE_SYSTEM,
        FILE_ATTRIBUTE_TEMPORARY,
    };

    /// Settable bits outside the four flags that must survive a write.
    const PRESERVED: u32 = FILE_ATTRIBUTE_TEMPORARY | FILE_ATTRIBUTE_OFFLINE | FILE_ATTRIBUTE_NOT_CONTENT_INDEXED;

    pub fn merge(_path: &Path, metadata: &Metadata, attributes: &mut Attributes) {
        let bits = metadata.file_attributes();
        attributes.archive = bits & FILE_ATTRIBUTE_ARCHIVE != 0;
        attributes.hidden = bits & FILE_ATTRIBUTE_HIDDEN != 0;
        attributes.system = bits & FILE_ATTRIBUTE_SYSTEM != 0;
    }

    pub fn write(path: &Path, metadata: &Metadata, attributes: Attributes) -> Result<bool> {
        let mut bits = metadata.file_attributes() & PRESERVED;
        for (on, bit) in [
            (attributes.read_only, FILE_ATTRIBUTE_READONLY),
            (attributes.archive, FILE_ATTRIBUTE_ARCHIVE),
            (attributes.hidden, FILE_ATTRIBUTE_HIDDEN),
            (attributes.system, FILE_ATTRIBUTE_SYSTEM),
        ] {
            if on {
                bits |= bit;
            }
        }
        if bits == 0 {
            bits = FILE_ATTRIBUTE_NORMAL;
        }

        let wide: Vec<u16> = path.as_os_str().encode_wide().chain(std::iter::once(0)).collect();
        // SAFETY: `wide` is NUL-terminated and outlives the call.
        let ok = unsafe { SetFileAttributesW(wide.as_ptr(), bits) };
        if ok == 0 {
            return Err(ExplorerError::io(path, std::io::Error::last_os_error()));
        }
        Ok(true)
    }

    #[allow(clippy::permissions_set_readonly_false)]
    pub fn set_read_only(path: &Path, mut permissions: Permissions, read_only: bool) -> Result<()> {
        permissions.set_readonly(read_only);
        fs::set_permissions(path, permissions).map_err(|e| ExplorerError::io(path, e))
    }
}

#[cfg(not(any(unix, windows)))]
mod native {
    use super::Attributes;
    use crate::error::{ExplorerError, Result};
    use std::fs::{self, Metadata, Permissions};
    use std::path::Path;

    pub fn merge(_path: &Path, _metadata: &Metadata, _attributes: &mut Attributes) {}

    pub fn write(path: &Path, metadata: &Metadata, attributes: Attributes) -> Result<bool> {
        if metadata.permissions().readonly() != attributes.read_only {
            set_read_only(path, metadata.permissions(), attributes.read_only)?;
        }
        Ok(false)
    }

    #[allow(clippy::permissions_set_readonly_false)]
    pub fn set_read_only(path: &Path, mut permissions: Permissions, read_only: bool) -> Result<()> {
        permissions.set_readonly(read_only);
        fs::set_permissions(path, permissions).map_err(|e| ExplorerError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    #[rstest]
    #[case(Attributes::default(), "----")]
    #[case(Attributes { archive: true, ..Default::default() }, "-a--")]
    #[case(Attributes { read_only: true, hidden: true, ..Default::default() }, "r-h-")]
    #[case(Attributes { read_only: true, archive: true, hidden: true, system: true }, "rahs")]
    fn test_attribute_code(#[case] attributes: Attributes, #[case] expected: &str) {
        assert_eq!(attributes.code(), expected);
        assert_eq!(attributes.to_string(), expected);
    }

    #[test]
    fn test_apply_and_query() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.txt");
        fs::write(&file, "x").unwrap();

        let mut store = LedgerAttributes::in_memory();
        let wanted = Attributes { read_only: true, system: true, ..Default::default() };
        store.apply(&file, wanted).unwrap();
        assert_eq!(store.query(&file).unwrap(), wanted);

        store.apply(&file, Attributes::default()).unwrap();
        assert_eq!(store.query(&file).unwrap(), Attributes::default());
    }

    #[test]
    fn test_ledger_survives_reload() {
        let dir = TempDir::new().unwrap();
        let ledger = dir.path().join("state").join("attributes.json");
        let file = dir.path().join("b.txt");
        fs::write(&file, "x").unwrap();

        let mut store = LedgerAttributes::load(ledger.clone()).unwrap();
        store.apply(&file, Attributes::default().with(Attribute::Archive, true)).unwrap();
        drop(store);

        let store = LedgerAttributes::load(ledger).unwrap();
        assert_eq!(store.query(&file).unwrap().code(), "-a--");
    }

    #[test]
    fn test_forget_drops_descendants() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        let inner = sub.join("c.txt");
        fs::write(&inner, "").unwrap();

        let mut store = LedgerAttributes::in_memory();
        store.apply(&inner, Attributes::default().with(Attribute::Hidden, true)).unwrap();
        store.forget(&sub).unwrap();
        assert!(store.flags.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_dotfiles_report_hidden() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join(".secret");
        fs::write(&file, "").unwrap();
        let store = LedgerAttributes::in_memory();
        assert!(store.query(&file).unwrap().hidden);
    }

    #[cfg(windows)]
    #[test]
    fn test_native_bits_replace_os_archive() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("fresh.txt");
        fs::write(&file, "x").unwrap();

        let mut store = LedgerAttributes::in_memory();
        let wanted = Attributes { read_only: true, hidden: true, ..Default::default() };
        store.apply(&file, wanted).unwrap();
        assert_eq!(store.query(&file).unwrap().code(), "r-h-");
        assert!(store.flags.is_empty());

        store.apply(&file, Attributes::default()).unwrap();
        assert_eq!(store.query(&file).unwrap().code(), "----");
    }

    #[test]
    fn test_clear_read_only() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("ro.txt");
        fs::write(&file, "").unwrap();
        let mut store = LedgerAttributes::in_memory();
        store.apply(&file, Attributes::default().with(Attribute::ReadOnly, true)).unwrap();

        clear_read_only(&file).unwrap();
        assert!(!store.query(&file).unwrap().read_only);
    }

    #[test]
    fn test_query_missing_path_fails() {
        let store = LedgerAttributes::in_memory();
        assert!(store.query(Path::new("/definitely/not/here")).is_err());
    }
}
