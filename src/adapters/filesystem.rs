use crate::domain::Walk;
use crate::ports::FileSystemPort;
use ignore::WalkBuilder;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;
#[cfg(not(unix))]
use std::path::PathBuf;

/// Files already listed by a walk. A file reachable under two names (a hard
/// link, or a symlink when links are followed) is listed under the first.
#[derive(Debug, Default)]
struct SeenFiles {
    #[cfg(unix)]
    seen: HashSet<(u64, u64)>,
    #[cfg(not(unix))]
    seen: HashSet<PathBuf>,
}

impl SeenFiles {
    #[cfg(unix)]
    fn first_visit(&mut self, path: &Path) -> bool {
        use std::os::unix::fs::MetadataExt;

        match fs::metadata(path) {
            Ok(meta) => self.seen.insert((meta.dev(), meta.ino())),
            Err(_) => true,
        }
    }

    #[cfg(not(unix))]
    fn first_visit(&mut self, path: &Path) -> bool {
        match fs::canonicalize(path) {
            Ok(real) => self.seen.insert(real),
            Err(_) => true,
        }
    }
}

pub struct FileSystemAdapter;

impl FileSystemAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FileSystemAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystemPort for FileSystemAdapter {
    fn walk(&self, root: &Path, follow_symlinks: bool) -> Walk {
        let mut builder = WalkBuilder::new(root);
        builder
            .standard_filters(false)
            .follow_links(follow_symlinks)
            .sort_by_file_name(|a, b| a.cmp(b));

        let mut walk = Walk::default();
        let mut seen = SeenFiles::default();
        for entry in builder.build() {
            match entry {
                Ok(entry) => {
                    if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                        continue;
                    }
                    if seen.first_visit(entry.path()) {
                        walk.files.push(entry.into_path());
                    } else {
                        log::debug!("Skipping second link to a listed file: {}", entry.path().display());
                        walk.aliases += 1;
                    }
                }
                Err(err) => {
                    log::warn!("Skipping unreadable entry: {}", err);
                    walk.errors += 1;
                }
            }
        }

        log::debug!(
            "Walked {}: {} files, {} linked aliases, {} skipped entries",
            root.display(),
            walk.files.len(),
            walk.aliases,
            walk.errors
        );
        walk
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("a/b")).unwrap();
        fs::create_dir_all(dir.path().join(".hidden")).unwrap();
        fs::write(dir.path().join("root.txt"), b"r").unwrap();
        fs::write(dir.path().join("a/one.txt"), b"1").unwrap();
        fs::write(dir.path().join("a/b/two.txt"), b"2").unwrap();
        fs::write(dir.path().join(".hidden/three.txt"), b"3").unwrap();
        fs::write(dir.path().join(".gitignore"), b"*.txt\n").unwrap();
        dir
    }

    #[test]
    fn test_walk_yields_every_regular_file() {
        let dir = tree();

        let walk = FileSystemAdapter::new().walk(dir.path(), false);

        assert_eq!(walk.errors, 0);
        assert_eq!(walk.files.len(), 5);
        assert!(walk.files.iter().all(|p| p.is_file()));
        assert!(walk.files.contains(&dir.path().join(".hidden/three.txt")));
        assert!(walk.files.contains(&dir.path().join("a/b/two.txt")));
    }

    #[test]
    fn test_walk_order_is_stable() {
        let dir = tree();
        let fs_adapter = FileSystemAdapter::new();

        let first = fs_adapter.walk(dir.path(), false);
        let second = fs_adapter.walk(dir.path(), false);

        assert_eq!(first.files, second.files);
    }

    #[test]
    fn test_walk_empty_directory() {
        let dir = TempDir::new().unwrap();

        let walk = FileSystemAdapter::new().walk(dir.path(), false);

        assert!(walk.files.is_empty());
        assert_eq!(walk.errors, 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_skips_symlinks_unless_followed() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("real.txt"), b"x").unwrap();
        std::os::unix::fs::symlink(dir.path().join("real.txt"), dir.path().join("link.txt"))
            .unwrap();

        let walk = FileSystemAdapter::new().walk(dir.path(), false);

        assert_eq!(walk.files, vec![dir.path().join("real.txt")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_survives_symlink_loop() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/file.txt"), b"x").unwrap();
        std::os::unix::fs::symlink(dir.path(), dir.path().join("sub/loop")).unwrap();

        let walk = FileSystemAdapter::new().walk(dir.path(), true);

        assert_eq!(walk.files, vec![dir.path().join("sub/file.txt")]);
        assert!(walk.errors >= 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_followed_symlink_is_listed_once() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("z_real.txt"), b"precious").unwrap();
        std::os::unix::fs::symlink(dir.path().join("z_real.txt"), dir.path().join("a_link.txt"))
            .unwrap();

        let walk = FileSystemAdapter::new().walk(dir.path(), true);

        assert_eq!(walk.files, vec![dir.path().join("a_link.txt")]);
        assert_eq!(walk.aliases, 1);
        assert_eq!(walk.errors, 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_directory_is_not_listed_twice() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("real")).unwrap();
        fs::write(dir.path().join("real/file.txt"), b"x").unwrap();
        std::os::unix::fs::symlink(dir.path().join("real"), dir.path().join("alias")).unwrap();

        let walk = FileSystemAdapter::new().walk(dir.path(), true);

        assert_eq!(walk.files, vec![dir.path().join("alias/file.txt")]);
        assert_eq!(walk.aliases, 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_hard_links_are_listed_once() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("one.txt"), b"x").unwrap();
        fs::hard_link(dir.path().join("one.txt"), dir.path().join("two.txt")).unwrap();
        fs::write(dir.path().join("three.txt"), b"x").unwrap();

        let walk = FileSystemAdapter::new().walk(dir.path(), false);

        assert_eq!(
            walk.files,
            vec![dir.path().join("one.txt"), dir.path().join("three.txt")]
        );
        assert_eq!(walk.aliases, 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_skips_unenterable_directory() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let locked = dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::write(locked.join("hidden.txt"), b"x").unwrap();
        fs::write(dir.path().join("a.txt"), b"x").unwrap();
        fs::write(dir.path().join("z.txt"), b"x").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        if fs::read_dir(&locked).is_ok() {
            // Privileged users can enter any directory.
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let walk = FileSystemAdapter::new().walk(dir.path(), false);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(walk.files, vec![dir.path().join("a.txt"), dir.path().join("z.txt")]);
        assert!(walk.errors >= 1);
    }

    #[test]
    fn test_remove_file_reports_not_found() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("x.txt");
        fs::write(&path, b"x").unwrap();
        let fs_adapter = FileSystemAdapter::new();

        fs_adapter.remove_file(&path).unwrap();
        let err = fs_adapter.remove_file(&path).unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
