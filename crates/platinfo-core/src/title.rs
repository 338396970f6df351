//! Process-wide title store.
//!
//! Holds the user-visible process title, seeded with `argv[0]`. Updates go
//! through [`OsApi::set_process_name`] while the write lock is held; the
//! stored text is only swapped once the OS call succeeded, so the store
//! always matches the last applied rename. Readers always see a whole title:
//! the text is replaced under a lock, never edited in place, and the old
//! value is released after the swap.

use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use crate::collector::os::OsApi;
use crate::error::PlatformError;

/// Owned holder of a process title.
#[derive(Debug)]
pub struct ProcessTitleStore {
    current: RwLock<Arc<str>>,
}

impl ProcessTitleStore {
    pub fn new(initial: &str) -> Self {
        Self {
            current: RwLock::new(Arc::from(initial)),
        }
    }

    /// Current title. Its length is `len()` of the returned text.
    pub fn get(&self) -> Arc<str> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Renames the OS-visible process, then replaces the stored title.
    ///
    /// Both happen under the write lock. On error the stored title is left
    /// untouched.
    pub fn set<O: OsApi>(&self, os: &O, title: &str) -> Result<(), PlatformError> {
        let next: Arc<str> = Arc::from(title);
        let previous = {
            let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
            os.set_process_name(title)?;
            std::mem::replace(&mut *guard, next)
        };
        drop(previous);
        Ok(())
    }
}

static STORE: OnceLock<ProcessTitleStore> = OnceLock::new();

/// Seeds the process-wide store with the first launch argument.
///
/// Only the first call has an effect.
pub fn setup(argv0: &str) -> &'static ProcessTitleStore {
    STORE.get_or_init(|| ProcessTitleStore::new(argv0))
}

/// Seeds the process-wide store from `std::env::args()`.
pub fn setup_from_args() -> &'static ProcessTitleStore {
    let argv0 = std::env::args().next().unwrap_or_default();
    setup(&argv0)
}

/// Current process title; empty if the store was never set up.
pub fn title() -> Arc<str> {
    title_of(STORE.get())
}

fn title_of(store: Option<&ProcessTitleStore>) -> Arc<str> {
    store.map(ProcessTitleStore::get).unwrap_or_else(|| Arc::from(""))
}

/// Sets the process-wide title through `os`.
///
/// Calling this before [`setup`] seeds the store with an empty title first.
pub fn set_title<O: OsApi>(os: &O, title: &str) -> Result<(), PlatformError> {
    STORE
        .get_or_init(|| ProcessTitleStore::new(""))
        .set(os, title)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use crate::collector::mock::MockOs;
    use std::thread;

    #[test]
    fn test_seeded_title() {
        let store = ProcessTitleStore::new("/usr/bin/node");
        assert_eq!(&*store.get(), "/usr/bin/node");
        assert_eq!(store.get().len(), 13);
    }

    #[test]
    fn test_set_then_get() {
        let os = MockOs::new();
        let store = ProcessTitleStore::new("node");
        store.set(&os, "my-server").unwrap();

        assert_eq!(&*store.get(), "my-server");
        assert_eq!(os.applied_names(), vec!["my-server".to_string()]);
    }

    #[test]
    fn test_unsupported_leaves_title_unchanged() {
        let os = MockOs {
            supports_process_name: false,
            ..MockOs::new()
        };
        let store = ProcessTitleStore::new("node");
        let err = store.set(&os, "renamed").unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotSupported);
        assert_eq!(&*store.get(), "node");
        assert!(os.applied_names().is_empty());
    }

    #[test]
    fn test_readers_see_whole_titles() {
        let store = Arc::new(ProcessTitleStore::new("aaaa"));
        let os = MockOs::new();

        let writer = {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..200 {
                    let title = if i % 2 == 0 { "bbbbbbbb" } else { "aaaa" };
                    store.set(&os, title).unwrap();
                }
            })
        };
        for _ in 0..200 {
            let seen = store.get();
            assert!(&*seen == "aaaa" || &*seen == "bbbbbbbb");
        }
        writer.join().unwrap();
    }

    #[test]
    fn test_store_matches_last_rename() {
        let store = Arc::new(ProcessTitleStore::new("init"));
        let os = MockOs::new();
        let writers: Vec<_> = ["alpha", "beta"]
            .into_iter()
            .map(|title| {
                let store = Arc::clone(&store);
                let os = os.clone();
                thread::spawn(move || {
                    for _ in 0..100 {
                        store.set(&os, title).unwrap();
                    }
                })
            })
            .collect();
        for writer in writers {
            writer.join().unwrap();
        }
        let applied = os.applied_names();
        assert_eq!(applied.len(), 200);
        assert_eq!(applied.last().map(String::as_str), Some(&*store.get()));
    }

    #[test]
    fn test_title_without_setup_is_empty() {
        let title = title_of(None);
        assert_eq!(&*title, "");
        assert_eq!(title.len(), 0);
        let store = ProcessTitleStore::new("node");
        assert_eq!(&*title_of(Some(&store)), "node");
    }

    #[test]
    fn test_global_store() {
        let store = setup("argv0-for-tests");
        // A second setup keeps the first value.
        let again = setup("ignored");
        assert!(std::ptr::eq(store, again));
        assert_eq!(&*title(), "argv0-for-tests");

        set_title(&MockOs::new(), "renamed-for-tests").unwrap();
        assert_eq!(&*title(), "renamed-for-tests");
    }
}
