//! Element and value validation strategies.

use crate::config::ValidationMode;
use crate::error::{ErrorKind, Fault};
use crate::namespace::{ElementRef, NamespaceTable};
use crate::types::DataMap;

/// Strategy deciding which element names and values the adapter accepts.
///
/// Resolution returns `Ok(None)` when the strategy accepts a name the table
/// does not know; the adapter then treats it as a free read-write element.
pub trait ValidationStrategy: Send + Sync {
    /// Get the strategy name for debugging
    fn name(&self) -> &str;

    /// Resolve an element name against the table
    fn resolve<'t>(
        &self,
        table: &'t NamespaceTable,
        element: &str,
    ) -> Result<Option<ElementRef<'t>>, Fault>;

    /// Check that an element may be read
    fn check_read(&self, element: Option<&ElementRef<'_>>) -> Result<(), Fault>;

    /// Check that `value` may be written to an element, given the current store
    fn check_write(
        &self,
        element: Option<&ElementRef<'_>>,
        value: &str,
        data: &DataMap,
    ) -> Result<(), Fault>;
}

/// SCORM-conformant validation against the namespace table.
#[derive(Debug, Clone, Default)]
pub struct StrictValidation;

impl StrictValidation {
    pub fn new() -> Self {
        Self
    }
}

impl ValidationStrategy for StrictValidation {
    fn name(&self) -> &str {
        "StrictValidation"
    }

    fn resolve<'t>(
        &self,
        table: &'t NamespaceTable,
        element: &str,
    ) -> Result<Option<ElementRef<'t>>, Fault> {
        if element.is_empty() {
            return Err(Fault::new(ErrorKind::UnknownElement, "empty element name"));
        }
        table.lookup(element).map(Some).ok_or_else(|| {
            Fault::new(
                ErrorKind::UnknownElement,
                format!("'{}' is not a data model element", element),
            )
        })
    }

    fn check_read(&self, element: Option<&ElementRef<'_>>) -> Result<(), Fault> {
        match element {
            Some(el) if !el.def.access.is_readable() => Err(Fault::new(
                ErrorKind::WriteOnlyElement,
                format!("{} is write only", el.def.name),
            )),
            _ => Ok(()),
        }
    }

    fn check_write(
        &self,
        element: Option<&ElementRef<'_>>,
        value: &str,
        data: &DataMap,
    ) -> Result<(), Fault> {
        let Some(el) = element else {
            return Ok(());
        };

        if el.def.is_keyword() {
            return Err(Fault::new(
                ErrorKind::KeywordElement,
                format!("{} is a keyword", el.def.name),
            ));
        }
        if !el.def.access.is_writable() {
            return Err(Fault::new(
                ErrorKind::ReadOnlyElement,
                format!("{} is read only", el.def.name),
            ));
        }
        el.def.data_type.validate(value)?;
        el.check_sequence(data)
    }
}

/// Accept-anything validation, matching LMSs that store whatever content sends.
///
/// Known elements still keep their defaults on read.
#[derive(Debug, Clone, Default)]
pub struct PermissiveValidation;

impl PermissiveValidation {
    pub fn new() -> Self {
        Self
    }
}

impl ValidationStrategy for PermissiveValidation {
    fn name(&self) -> &str {
        "PermissiveValidation"
    }

    fn resolve<'t>(
        &self,
        table: &'t NamespaceTable,
        element: &str,
    ) -> Result<Option<ElementRef<'t>>, Fault> {
        Ok(table.lookup(element))
    }

    fn check_read(&self, _element: Option<&ElementRef<'_>>) -> Result<(), Fault> {
        Ok(())
    }

    fn check_write(
        &self,
        _element: Option<&ElementRef<'_>>,
        _value: &str,
        _data: &DataMap,
    ) -> Result<(), Fault> {
        Ok(())
    }
}

/// Pick the strategy for a configured validation mode
pub fn select_validation_strategy(mode: ValidationMode) -> Box<dyn ValidationStrategy> {
    match mode {
        ValidationMode::Strict => Box::new(StrictValidation::new()),
        ValidationMode::Permissive => Box::new(PermissiveValidation::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_rejects_unknown_and_misuse() {
        let table = NamespaceTable::scorm12();
        let strict = StrictValidation::new();
        let data = DataMap::new();

        let err = strict.resolve(&table, "cmi.core.bogus").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnknownElement);
        assert!(strict.resolve(&table, "").is_err());

        let exit = strict.resolve(&table, "cmi.core.exit").unwrap();
        assert_eq!(
            strict.check_read(exit.as_ref()).unwrap_err().kind,
            ErrorKind::WriteOnlyElement
        );
        assert!(strict.check_write(exit.as_ref(), "suspend", &data).is_ok());

        let credit = strict.resolve(&table, "cmi.core.credit").unwrap();
        assert_eq!(
            strict
                .check_write(credit.as_ref(), "credit", &data)
                .unwrap_err()
                .kind,
            ErrorKind::ReadOnlyElement
        );

        let count = strict.resolve(&table, "cmi.objectives._count").unwrap();
        assert_eq!(
            strict.check_write(count.as_ref(), "3", &data).unwrap_err().kind,
            ErrorKind::KeywordElement
        );
        let children = strict.resolve(&table, "cmi.core._children").unwrap();
        assert_eq!(
            strict
                .check_write(children.as_ref(), "student_id", &data)
                .unwrap_err()
                .kind,
            ErrorKind::KeywordElement
        );

        let raw = strict.resolve(&table, "cmi.core.score.raw").unwrap();
        assert_eq!(
            strict.check_write(raw.as_ref(), "150", &data).unwrap_err().kind,
            ErrorKind::RangeOutOfBounds
        );
    }

    #[test]
    fn test_permissive_accepts_anything() {
        let table = NamespaceTable::scorm12();
        let permissive = PermissiveValidation::new();
        let data = DataMap::new();

        assert!(permissive.resolve(&table, "x.y.z").unwrap().is_none());
        let raw = permissive.resolve(&table, "cmi.core.score.raw").unwrap();
        assert!(raw.is_some());
        assert!(permissive.check_write(raw.as_ref(), "150", &data).is_ok());
        assert!(permissive.check_read(None).is_ok());
    }

    #[test]
    fn test_select_validation_strategy() {
        assert_eq!(
            select_validation_strategy(ValidationMode::Strict).name(),
            "StrictValidation"
        );
        assert_eq!(
            select_validation_strategy(ValidationMode::Permissive).name(),
            "PermissiveValidation"
        );
    }
}
