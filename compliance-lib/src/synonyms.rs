//! Canonical fields of a training-compliance export and the header labels
//! accepted for each of them.

use serde::Serialize;
use std::fmt;

use crate::utils::normalize_text;

/// Fields the pipeline knows how to locate in an export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum CanonicalField {
    CollaboratorName,
    Direction,
    Branch,
    Course,
    RecordStatus,
    Position,
    EmploymentStatus,
    BusinessUnit,
    Manager,
    Email,
    ManagerName,
}

/// Fields classification cannot run without, in reporting order
pub const REQUIRED_FIELDS: [CanonicalField; 5] = [
    CanonicalField::CollaboratorName,
    CanonicalField::Direction,
    CanonicalField::Branch,
    CanonicalField::Course,
    CanonicalField::RecordStatus,
];

/// Positional column names of the fixed-layout export (after the skipped title rows)
pub const LEGACY_COLUMN_LAYOUT: [&str; 16] = [
    "Nombre_Colaborador",
    "Puesto",
    "Estatus",
    "Dirección",
    "Sucursal",
    "Unidad_Negocio",
    "Estado",
    "Jefe_Inmediato",
    "Curso",
    "Estado_Expediente",
    "Correo",
    "Jefe_Nombre",
    "Extra1",
    "Extra2",
    "Fecha1",
    "Fecha2",
];

impl CanonicalField {
    pub const ALL: [CanonicalField; 11] = [
        CanonicalField::CollaboratorName,
        CanonicalField::Direction,
        CanonicalField::Branch,
        CanonicalField::Course,
        CanonicalField::RecordStatus,
        CanonicalField::Position,
        CanonicalField::EmploymentStatus,
        CanonicalField::BusinessUnit,
        CanonicalField::Manager,
        CanonicalField::Email,
        CanonicalField::ManagerName,
    ];

    /// Field whose report label matches `label` after normalization
    pub fn from_label(label: &str) -> Option<CanonicalField> {
        let wanted = normalize_text(label);
        CanonicalField::ALL
            .into_iter()
            .find(|field| normalize_text(field.label()) == wanted)
    }

    /// Column name used for this field in reports and exports
    pub fn label(&self) -> &'static str {
        match self {
            CanonicalField::CollaboratorName => "Nombre_Colaborador",
            CanonicalField::Direction => "Dirección",
            CanonicalField::Branch => "Sucursal",
            CanonicalField::Course => "Curso",
            CanonicalField::RecordStatus => "Estado_Expediente",
            CanonicalField::Position => "Puesto",
            CanonicalField::EmploymentStatus => "Estatus",
            CanonicalField::BusinessUnit => "Unidad_Negocio",
            CanonicalField::Manager => "Jefe_Inmediato",
            CanonicalField::Email => "Correo",
            CanonicalField::ManagerName => "Jefe_Nombre",
        }
    }

    pub fn is_required(&self) -> bool {
        REQUIRED_FIELDS.contains(self)
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Canonical field → accepted header labels, both in priority order
///
/// Earlier synonyms win over later ones when more than one is present in a file.
#[derive(Debug, Clone, PartialEq)]
pub struct SynonymCatalog {
    entries: Vec<(CanonicalField, Vec<String>)>,
}

impl SynonymCatalog {
    pub fn new(entries: Vec<(CanonicalField, Vec<String>)>) -> Self {
        SynonymCatalog { entries }
    }

    /// Build a catalog from string literals
    pub fn from_static(entries: &[(CanonicalField, &[&str])]) -> Self {
        SynonymCatalog::new(
            entries
                .iter()
                .map(|(field, labels)| (*field, labels.iter().map(|l| l.to_string()).collect()))
                .collect(),
        )
    }

    /// Only the five fields classification needs
    pub fn required_only() -> Self {
        let catalog = SynonymCatalog::default();
        SynonymCatalog::new(
            catalog
                .entries
                .into_iter()
                .filter(|(field, _)| field.is_required())
                .collect(),
        )
    }

    pub fn entries(&self) -> &[(CanonicalField, Vec<String>)] {
        &self.entries
    }

    pub fn synonyms(&self, field: CanonicalField) -> &[String] {
        self.entries
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, labels)| labels.as_slice())
            .unwrap_or(&[])
    }

    /// Every accepted label across all fields
    pub fn all_labels(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .flat_map(|(_, labels)| labels.iter().map(|l| l.as_str()))
    }

    pub fn fields(&self) -> impl Iterator<Item = CanonicalField> + '_ {
        self.entries.iter().map(|(field, _)| *field)
    }
}

impl Default for SynonymCatalog {
    fn default() -> Self {
        SynonymCatalog::from_static(&[
            (
                CanonicalField::CollaboratorName,
                &[
                    "Usuario - Nombre completo del usuario",
                    "Nombre_Colaborador",
                    "Nombre",
                    "Colaborador",
                    "Empleado",
                    "Nombre del colaborador",
                ],
            ),
            (
                CanonicalField::Direction,
                &[
                    "Usuario - Dirección",
                    "Dirección",
                    "Direccion",
                    "Dirección / Área",
                    "Direccion / Area",
                    "Dirección General",
                ],
            ),
            (
                CanonicalField::Branch,
                &[
                    "Usuario - Departamento",
                    "Usuario - Departamento Parent",
                    "Sucursal",
                    "Departamento",
                    "Área",
                    "Area",
                    "Unidad",
                    "Subárea",
                    "Subarea",
                ],
            ),
            (
                CanonicalField::Course,
                &[
                    "Capacitación - Título de la capacitación",
                    "Curso",
                    "Nombre_Curso",
                    "Curso Asignado",
                    "Capacitación",
                    "Capacitacion",
                    "Nombre del curso",
                ],
            ),
            (
                CanonicalField::RecordStatus,
                &[
                    "Registro de capacitación - Estado del expediente",
                    "Estado_Expediente",
                    "Estatus_Expediente",
                    "Estado",
                    "Estatus",
                    "Status",
                    "Avance",
                ],
            ),
            (CanonicalField::Position, &["Usuario - Puesto", "Puesto"]),
            (
                CanonicalField::EmploymentStatus,
                &["Usuario - Estatus", "Estatus_Empleado"],
            ),
            (
                CanonicalField::BusinessUnit,
                &["Usuario - Unidad de negocio", "Unidad_Negocio", "Unidad de Negocio"],
            ),
            (
                CanonicalField::Manager,
                &["Usuario - Jefe inmediato", "Jefe_Inmediato", "Jefe Inmediato"],
            ),
            (
                CanonicalField::Email,
                &["Usuario - Correo electrónico", "Correo", "Correo electrónico", "Email"],
            ),
            (CanonicalField::ManagerName, &["Jefe_Nombre", "Nombre del jefe"]),
        ])
    }
}
