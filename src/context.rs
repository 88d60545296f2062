// ==============================================================================
// Translation Context
// ==============================================================================
//
// All mutable state of one translation lives here and is threaded through the
// translators by `&mut`. A context is created per root file and dropped with
// the finished document; nothing in it outlives a translation.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::model::swagger::{PathItem, Schema, Tag};

#[derive(Debug, Default)]
pub struct TranslationContext {
    /// Package of the file currently being walked; `""` before any
    /// `package` declaration.
    pub current_package: String,
    package_stack: Vec<String>,
    /// Output definitions keyed by qualified name. Last writer wins.
    pub definitions: BTreeMap<String, Schema>,
    /// Output paths keyed by route. Last writer wins.
    pub paths: BTreeMap<String, PathItem>,
    /// Service tags in first-seen order, unique by name.
    tags: IndexMap<String, Tag>,
    /// Resolved paths of the imports currently being walked, outermost first.
    import_stack: Vec<PathBuf>,
}

impl TranslationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Save the current package before walking an imported file.
    pub fn push_package(&mut self) {
        self.package_stack.push(self.current_package.clone());
    }

    /// Restore the package saved by the matching [`push_package`](Self::push_package).
    pub fn pop_package(&mut self) {
        if let Some(package) = self.package_stack.pop() {
            self.current_package = package;
        }
    }

    /// Mark `path` as being walked. Returns `false` if it is already on the
    /// active import chain, i.e. importing it again would cycle.
    pub fn enter_import(&mut self, path: &Path) -> bool {
        if self.import_stack.iter().any(|active| active == path) {
            return false;
        }
        self.import_stack.push(path.to_path_buf());
        true
    }

    pub fn leave_import(&mut self) {
        self.import_stack.pop();
    }

    /// Record a service tag. Repeated names keep the first description.
    pub fn add_tag(&mut self, name: &str, description: String) {
        self.tags.entry(name.to_string()).or_insert_with(|| Tag {
            description,
            name: name.to_string(),
        });
    }

    /// Tags in the order their services were first seen.
    pub fn tags(&self) -> Vec<Tag> {
        self.tags.values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn package_stack_restores_in_lifo_order() {
        let mut ctx = TranslationContext::new();
        ctx.current_package = "root".to_string();
        ctx.push_package();
        ctx.current_package = "first".to_string();
        ctx.push_package();
        ctx.current_package = "second".to_string();

        ctx.pop_package();
        assert_eq!(ctx.current_package, "first");
        ctx.pop_package();
        assert_eq!(ctx.current_package, "root");
        ctx.pop_package();
        assert_eq!(ctx.current_package, "root");
    }

    #[test]
    fn import_stack_detects_cycles_only_on_active_chain() {
        let mut ctx = TranslationContext::new();
        assert!(ctx.enter_import(Path::new("a.proto")));
        assert!(ctx.enter_import(Path::new("b.proto")));
        assert!(!ctx.enter_import(Path::new("a.proto")));
        ctx.leave_import();
        ctx.leave_import();
        assert!(ctx.enter_import(Path::new("a.proto")));
    }

    #[test]
    fn tags_are_unique_and_ordered() {
        let mut ctx = TranslationContext::new();
        ctx.add_tag("Orders", "first".to_string());
        ctx.add_tag("Billing", String::new());
        ctx.add_tag("Orders", "second".to_string());

        let tags = ctx.tags();
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].name, "Orders");
        assert_eq!(tags[0].description, "first");
        assert_eq!(tags[1].name, "Billing");
    }
}
