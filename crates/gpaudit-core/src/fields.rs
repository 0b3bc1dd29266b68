//! Field state: the named values a user types into the report form
//!
//! Every field always holds a string; the defaults are non-empty sample
//! values. There is no cross-field validation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// A form field name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    GpName,
    Mandal,
    District,
    FinancialYear,
    ReportDate,
    AuditorName,
    Sarpanch,
    Secretary,
    Income,
    Expense,
    FinalDate,
}

impl Field {
    /// All fields in form order
    pub const ALL: [Field; 11] = [
        Field::GpName,
        Field::Mandal,
        Field::District,
        Field::FinancialYear,
        Field::ReportDate,
        Field::AuditorName,
        Field::Sarpanch,
        Field::Secretary,
        Field::Income,
        Field::Expense,
        Field::FinalDate,
    ];

    /// Key used in field files and `--set` overrides
    pub fn key(self) -> &'static str {
        match self {
            Field::GpName => "gpName",
            Field::Mandal => "mandal",
            Field::District => "district",
            Field::FinancialYear => "financialYear",
            Field::ReportDate => "reportDate",
            Field::AuditorName => "auditorName",
            Field::Sarpanch => "sarpanch",
            Field::Secretary => "secretary",
            Field::Income => "income",
            Field::Expense => "expense",
            Field::FinalDate => "finalDate",
        }
    }

    /// Form label shown next to the input
    pub fn label(self) -> &'static str {
        match self {
            Field::GpName => "గ్రామ పంచాయతీ పేరు",
            Field::Mandal => "మండలం",
            Field::District => "జిల్లా",
            Field::FinancialYear => "ఆర్థిక సంవత్సరం",
            Field::ReportDate => "ఆడిట్ నివేదిక తేదీ",
            Field::AuditorName => "ఆడిట్ రిపోర్టర్ పేరు",
            Field::Sarpanch => "సర్పంచ్ పేరు",
            Field::Secretary => "కార్యదర్శి పేరు",
            Field::Income => "మొత్తం ఆదాయం",
            Field::Expense => "మొత్తం వ్యయం",
            Field::FinalDate => "తేదీ",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Field {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Field::ALL
            .into_iter()
            .find(|f| f.key().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CoreError::UnknownField(wanted.to_string()))
    }
}

/// Current values of every form field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FieldState {
    pub gp_name: String,
    pub mandal: String,
    pub district: String,
    pub financial_year: String,
    pub report_date: String,
    pub auditor_name: String,
    pub sarpanch: String,
    pub secretary: String,
    pub income: String,
    pub expense: String,
    pub final_date: String,
}

impl Default for FieldState {
    fn default() -> Self {
        Self {
            gp_name: "రావులపాలెం గ్రామ పంచాయతీ".to_string(),
            mandal: "రావులపాలెం మండలం".to_string(),
            district: "కోనసీమ జిల్లా".to_string(),
            financial_year: "2024 - 2025".to_string(),
            report_date: "15-14-2025".to_string(),
            auditor_name: "శ్రీ కె. సత్యనారాయణ".to_string(),
            sarpanch: "శ్రీమతి ఎస్. సావిత్రమ్మ".to_string(),
            secretary: "శ్రీ ఎం. శ్రీనివాస్".to_string(),
            income: "28,75,000".to_string(),
            expense: "27,90,000".to_string(),
            final_date: "15-03-2025".to_string(),
        }
    }
}

impl FieldState {
    /// Parse a TOML field file; keys that are absent keep their defaults
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize every field as TOML
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::GpName => &self.gp_name,
            Field::Mandal => &self.mandal,
            Field::District => &self.district,
            Field::FinancialYear => &self.financial_year,
            Field::ReportDate => &self.report_date,
            Field::AuditorName => &self.auditor_name,
            Field::Sarpanch => &self.sarpanch,
            Field::Secretary => &self.secretary,
            Field::Income => &self.income,
            Field::Expense => &self.expense,
            Field::FinalDate => &self.final_date,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::GpName => &mut self.gp_name,
            Field::Mandal => &mut self.mandal,
            Field::District => &mut self.district,
            Field::FinancialYear => &mut self.financial_year,
            Field::ReportDate => &mut self.report_date,
            Field::AuditorName => &mut self.auditor_name,
            Field::Sarpanch => &mut self.sarpanch,
            Field::Secretary => &mut self.secretary,
            Field::Income => &mut self.income,
            Field::Expense => &mut self.expense,
            Field::FinalDate => &mut self.final_date,
        };
        *slot = value.into();
    }

    /// Builder-style [`FieldState::set`]
    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    /// Apply a `key=value` override; the value may be empty
    pub fn apply_assignment(&mut self, assignment: &str) -> Result<Field> {
        let (key, value) = assignment
            .split_once('=')
            .ok_or_else(|| CoreError::InvalidAssignment(assignment.to_string()))?;
        let field: Field = key.parse()?;
        self.set(field, value);
        Ok(field)
    }

    /// Values of the given fields, in the given order
    pub fn snapshot(&self, fields: &[Field]) -> Vec<String> {
        fields.iter().map(|f| self.get(*f).to_string()).collect()
    }

    /// Iterate `(field, value)` pairs in form order
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        Field::ALL.into_iter().map(move |f| (f, self.get(f)))
    }
}
