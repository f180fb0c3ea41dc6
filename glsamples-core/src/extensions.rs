//! OpenGL extension requirements.
//!
//! A sample declares the [`Requirement`]s it needs; [`ExtensionSet::check`]
//! compares them with what the context advertises. Entry points that are not
//! part of the base API are looked up by name with [`resolve_entry_points`].

use std::collections::HashSet;
use std::ffi::c_void;
use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtensionError {
    #[error("required extensions were not found: {}", .0.join(", "))]
    Missing(Vec<String>),
    #[error("one or more extension functions were not found: {}", .0.join(", "))]
    MissingEntryPoints(Vec<String>),
}

/// A context version, compared major first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GlVersion {
    pub major: u32,
    pub minor: u32,
}

impl GlVersion {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }
}

impl fmt::Display for GlVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// An extension a sample needs.
///
/// When `core_since` is set, a context of at least that version satisfies the
/// requirement even if the extension string is not advertised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requirement {
    pub extension: &'static str,
    pub core_since: Option<GlVersion>,
}

impl Requirement {
    pub const fn extension(extension: &'static str) -> Self {
        Self {
            extension,
            core_since: None,
        }
    }

    pub const fn core_since(extension: &'static str, version: GlVersion) -> Self {
        Self {
            extension,
            core_since: Some(version),
        }
    }
}

/// The extensions advertised by a context.
#[derive(Debug, Clone, Default)]
pub struct ExtensionSet {
    names: HashSet<String>,
}

impl ExtensionSet {
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn satisfies(&self, requirement: &Requirement, version: GlVersion) -> bool {
        self.contains(requirement.extension)
            || requirement.core_since.is_some_and(|core| version >= core)
    }

    /// Checks every requirement and reports all the missing ones at once.
    pub fn check(
        &self,
        requirements: &[Requirement],
        version: GlVersion,
    ) -> Result<(), ExtensionError> {
        let missing: Vec<String> = requirements
            .iter()
            .filter(|r| !self.satisfies(r, version))
            .map(|r| r.extension.to_string())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ExtensionError::Missing(missing))
        }
    }
}

impl<S: Into<String>> FromIterator<S> for ExtensionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Looks up each entry point with `loader`, failing if any of them is null.
pub fn resolve_entry_points<F>(
    names: &[&str],
    mut loader: F,
) -> Result<Vec<*const c_void>, ExtensionError>
where
    F: FnMut(&str) -> *const c_void,
{
    let mut pointers = Vec::with_capacity(names.len());
    let mut missing = Vec::new();
    for name in names {
        let pointer = loader(name);
        if pointer.is_null() {
            missing.push(name.to_string());
        }
        pointers.push(pointer);
    }
    if missing.is_empty() {
        Ok(pointers)
    } else {
        Err(ExtensionError::MissingEntryPoints(missing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHADER_OBJECTS: Requirement =
        Requirement::core_since("GL_ARB_shader_objects", GlVersion::new(2, 0));
    const VERTEX_PROGRAM: Requirement = Requirement::extension("GL_ARB_vertex_program");

    #[test]
    fn duplicate_names_collapse() {
        let set: ExtensionSet = ["GL_ARB_vertex_program", "GL_ARB_fragment_program", "GL_EXT_bgra"]
            .into_iter()
            .chain(["GL_EXT_bgra"])
            .collect();
        assert_eq!(set.len(), 3);
        assert!(set.contains("GL_ARB_fragment_program"));
        assert!(!set.contains("GL_ARB"));
    }

    #[test]
    fn core_version_satisfies_a_promoted_extension() {
        let set = ExtensionSet::default();
        assert!(set.satisfies(&SHADER_OBJECTS, GlVersion::new(3, 0)));
        assert!(!set.satisfies(&SHADER_OBJECTS, GlVersion::new(1, 5)));
        assert!(!set.satisfies(&VERTEX_PROGRAM, GlVersion::new(4, 6)));
    }

    #[test]
    fn check_reports_every_missing_extension() {
        let set: ExtensionSet = ["GL_ARB_shading_language_100"].into_iter().collect();
        let requirements = [
            Requirement::extension("GL_ARB_shading_language_100"),
            VERTEX_PROGRAM,
            Requirement::extension("GL_ARB_fragment_program"),
        ];
        let err = set.check(&requirements, GlVersion::new(2, 1)).unwrap_err();
        assert_eq!(
            err,
            ExtensionError::Missing(vec![
                "GL_ARB_vertex_program".to_string(),
                "GL_ARB_fragment_program".to_string(),
            ])
        );
    }

    #[test]
    fn null_entry_points_are_all_reported() {
        let known = 0x1000usize as *const c_void;
        let result = resolve_entry_points(
            &["glGenProgramsARB", "glBindProgramARB", "glProgramStringARB"],
            |name| {
                if name == "glBindProgramARB" {
                    known
                } else {
                    std::ptr::null()
                }
            },
        );
        assert_eq!(
            result.unwrap_err(),
            ExtensionError::MissingEntryPoints(vec![
                "glGenProgramsARB".to_string(),
                "glProgramStringARB".to_string(),
            ])
        );
    }

    #[test]
    fn resolved_entry_points_keep_their_order() {
        let pointers =
            resolve_entry_points(&["a", "bb", "ccc"], |name| name.len() as *const c_void).unwrap();
        assert_eq!(
            pointers,
            vec![1 as *const c_void, 2 as *const c_void, 3 as *const c_void]
        );
    }
}
