//! Form field identifiers and the personnel record they address

use super::attachment::DocumentAttachment;

/// How a field is edited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Select,
    Document,
}

/// Every field of the personnel intake form, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldId {
    FullName,
    NationalId,
    Phone,
    Email,
    Address,
    Province,
    Municipality,
    Specialty,
    HireStatus,
    CvDocument,
}

impl FieldId {
    pub const ALL: [FieldId; 10] = [
        FieldId::FullName,
        FieldId::NationalId,
        FieldId::Phone,
        FieldId::Email,
        FieldId::Address,
        FieldId::Province,
        FieldId::Municipality,
        FieldId::Specialty,
        FieldId::HireStatus,
        FieldId::CvDocument,
    ];

    /// Name used on the wire (multipart part name and field-error key)
    pub fn name(self) -> &'static str {
        match self {
            Self::FullName => "full_name",
            Self::NationalId => "national_id",
            Self::Phone => "phone",
            Self::Email => "email",
            Self::Address => "address",
            Self::Province => "province_id",
            Self::Municipality => "municipality_id",
            Self::Specialty => "specialty",
            Self::HireStatus => "hire_status_id",
            Self::CvDocument => "cv_document",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::FullName => "Full name",
            Self::NationalId => "National ID (optional)",
            Self::Phone => "Phone",
            Self::Email => "Email (optional)",
            Self::Address => "Address",
            Self::Province => "Province",
            Self::Municipality => "Municipality",
            Self::Specialty => "Specialty",
            Self::HireStatus => "Hire status",
            Self::CvDocument => "CV (PDF/DOC/DOCX)",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            Self::Province | Self::Municipality | Self::HireStatus => FieldKind::Select,
            Self::CvDocument => FieldKind::Document,
            _ => FieldKind::Text,
        }
    }

    /// Resolve a field name reported by the backend.
    ///
    /// Accepts the canonical names plus the older names the intake API used
    /// before the record fields were renamed.
    pub fn from_wire_name(name: &str) -> Option<Self> {
        let field = match name.trim() {
            "full_name" | "personal_name" => Self::FullName,
            "national_id" | "personal_id" => Self::NationalId,
            "phone" => Self::Phone,
            "email" => Self::Email,
            "address" => Self::Address,
            "province_id" | "province" => Self::Province,
            "municipality_id" | "municipality" | "municipalitiy" => Self::Municipality,
            "specialty" => Self::Specialty,
            "hire_status_id" | "hire_status" => Self::HireStatus,
            "cv_document" | "cv" => Self::CvDocument,
            _ => return None,
        };
        Some(field)
    }
}

/// The personnel record under construction
#[derive(Debug, Default, PartialEq)]
pub struct PersonnelRecord {
    pub full_name: String,
    pub national_id: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub province_id: Option<String>,
    pub municipality_id: Option<String>,
    pub specialty: String,
    pub hire_status_id: Option<String>,
    pub cv_document: Option<DocumentAttachment>,
}

impl PersonnelRecord {
    /// Current value of a text or select field (empty for the document field)
    pub fn value(&self, field: FieldId) -> &str {
        match field {
            FieldId::FullName => &self.full_name,
            FieldId::NationalId => &self.national_id,
            FieldId::Phone => &self.phone,
            FieldId::Email => &self.email,
            FieldId::Address => &self.address,
            FieldId::Specialty => &self.specialty,
            FieldId::Province => self.province_id.as_deref().unwrap_or(""),
            FieldId::Municipality => self.municipality_id.as_deref().unwrap_or(""),
            FieldId::HireStatus => self.hire_status_id.as_deref().unwrap_or(""),
            FieldId::CvDocument => "",
        }
    }

    /// Mutable access to a free-text field; `None` for selects and the document
    pub fn text_mut(&mut self, field: FieldId) -> Option<&mut String> {
        match field {
            FieldId::FullName => Some(&mut self.full_name),
            FieldId::NationalId => Some(&mut self.national_id),
            FieldId::Phone => Some(&mut self.phone),
            FieldId::Email => Some(&mut self.email),
            FieldId::Address => Some(&mut self.address),
            FieldId::Specialty => Some(&mut self.specialty),
            _ => None,
        }
    }
}
