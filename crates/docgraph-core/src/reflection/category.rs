use crate::project::Project;
use crate::reflection::ReflectionId;

/// A titled grouping of a container's children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReflectionCategory {
    pub title: String,
    pub children: Vec<ReflectionId>,
}

impl ReflectionCategory {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            children: Vec::new(),
        }
    }

    /// Whether every child renders to its own document
    ///
    /// Children that are not declarations, or no longer exist, count as not
    /// documented. An empty category is trivially fully documented.
    pub fn all_children_have_own_document(&self, project: &Project) -> bool {
        self.children.iter().all(|id| {
            project
                .get(*id)
                .and_then(|r| r.as_declaration())
                .is_some_and(|decl| decl.has_own_document)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflection::ReflectionKind;

    #[test]
    fn test_all_children_have_own_document() {
        let mut project = Project::new("test");
        let a = project
            .add_declaration(None, "A", ReflectionKind::Class, None)
            .unwrap();
        let b = project
            .add_declaration(None, "B", ReflectionKind::Interface, None)
            .unwrap();

        let mut category = ReflectionCategory::new("Classes");
        assert!(category.all_children_have_own_document(&project));

        category.children = vec![a, b];
        project
            .get_mut(a)
            .and_then(|r| r.as_declaration_mut())
            .unwrap()
            .has_own_document = true;
        assert!(!category.all_children_have_own_document(&project));

        project
            .get_mut(b)
            .and_then(|r| r.as_declaration_mut())
            .unwrap()
            .has_own_document = true;
        assert!(category.all_children_have_own_document(&project));

        category.children.push(ReflectionId(99));
        assert!(!category.all_children_have_own_document(&project));
    }
}
