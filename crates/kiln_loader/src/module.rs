//! Loaded modules and the process-wide module table.

use std::sync::{Arc, Mutex};

/// The in-process handle to a loaded module.
///
/// Owned by the host for the lifetime of the process; a reload tears the
/// whole process down rather than replacing a module in place.
#[derive(Debug)]
pub struct LoadedModule {
    /// The unit name the module was loaded under.
    pub name: String,
    /// Size of the installed binary image, in bytes.
    pub image_size: usize,
    /// Whether an auxiliary debug-symbol stream was installed alongside.
    pub has_symbols: bool,
    /// Logical names of the resources attached to the payload.
    pub resource_names: Vec<String>,
}

/// The process-wide, append-only table of loaded modules.
///
/// Modules are only ever added. Installing a second module under an
/// existing name appends it; lookups return the first installation, so a
/// module, once loaded, is never replaced in place.
pub struct ModuleTable {
    modules: Mutex<Vec<Arc<LoadedModule>>>,
}

impl ModuleTable {
    /// Creates an empty module table.
    pub fn new() -> Self {
        Self {
            modules: Mutex::new(Vec::new()),
        }
    }

    /// Installs a module, returning the shared handle.
    pub fn install(&self, module: LoadedModule) -> Arc<LoadedModule> {
        let module = Arc::new(module);
        self.modules.lock().unwrap().push(Arc::clone(&module));
        module
    }

    /// Returns the first module installed under `name`, if any.
    pub fn get(&self, name: &str) -> Option<Arc<LoadedModule>> {
        self.modules
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.name == name)
            .cloned()
    }

    /// Returns the number of installed modules.
    pub fn len(&self) -> usize {
        self.modules.lock().unwrap().len()
    }

    /// Returns `true` when no module is installed.
    pub fn is_empty(&self) -> bool {
        self.modules.lock().unwrap().is_empty()
    }
}

impl Default for ModuleTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module(name: &str, size: usize) -> LoadedModule {
        LoadedModule {
            name: name.to_string(),
            image_size: size,
            has_symbols: false,
            resource_names: Vec::new(),
        }
    }

    #[test]
    fn install_and_get() {
        let table = ModuleTable::new();
        assert!(table.is_empty());

        let handle = table.install(module("App", 128));
        assert_eq!(table.len(), 1);
        assert!(Arc::ptr_eq(&handle, &table.get("App").unwrap()));
        assert!(table.get("Ghost").is_none());
    }

    #[test]
    fn append_only_first_wins_on_lookup() {
        let table = ModuleTable::new();
        let first = table.install(module("App", 1));
        table.install(module("App", 2));

        assert_eq!(table.len(), 2);
        assert!(Arc::ptr_eq(&first, &table.get("App").unwrap()));
        assert_eq!(table.get("App").unwrap().image_size, 1);
    }
}
