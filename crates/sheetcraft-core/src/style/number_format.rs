//! Number format types

/// Number format for cell display
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NumberFormat {
    /// General format (default)
    #[default]
    General,

    /// Built-in format by ID
    BuiltIn(u32),

    /// Custom format string
    Custom(String),
}

/// Built-in format codes with fixed ids. User formats are numbered from
/// [`NumberFormat::FIRST_CUSTOM_ID`].
const BUILTIN_FORMATS: &[(u32, &str)] = &[
    (0, "General"),
    (1, "0"),
    (2, "0.00"),
    (3, "#,##0"),
    (4, "#,##0.00"),
    (5, "($#,##0_);($#,##0)"),
    (6, "($#,##0_);[Red]($#,##0)"),
    (7, "($#,##0.00_);($#,##0.00)"),
    (8, "($#,##0.00_);[Red]($#,##0.00)"),
    (9, "0%"),
    (10, "0.00%"),
    (11, "0.00E+00"),
    (12, "# ?/?"),
    (13, "# ??/??"),
    (14, "m/d/yy"),
    (15, "d-mmm-yy"),
    (16, "d-mmm"),
    (17, "mmm-yy"),
    (18, "h:mm AM/PM"),
    (19, "h:mm:ss AM/PM"),
    (20, "h:mm"),
    (21, "h:mm:ss"),
    (22, "m/d/yy h:mm"),
    (37, "(#,##0_);(#,##0)"),
    (38, "(#,##0_);[Red](#,##0)"),
    (39, "(#,##0.00_);(#,##0.00)"),
    (40, "(#,##0.00_);[Red](#,##0.00)"),
    (41, "_(* #,##0_);_(* (#,##0);_(* \"-\"_);_(@_)"),
    (42, "_($* #,##0_);_($* (#,##0);_($* \"-\"_);_(@_)"),
    (43, "_(* #,##0.00_);_(* (#,##0.00);_(* \"-\"??_);_(@_)"),
    (44, "_($* #,##0.00_);_($* (#,##0.00);_($* \"-\"??_);_(@_)"),
    (45, "mm:ss"),
    (46, "[h]:mm:ss"),
    (47, "mm:ss.0"),
    (48, "##0.0E+0"),
    (49, "@"),
];

impl NumberFormat {
    /// First id handed out to custom format codes
    pub const FIRST_CUSTOM_ID: u32 = 164;

    pub const ID_GENERAL: u32 = 0;
    /// 2 - 0.00
    pub const ID_NUMBER_DEC2: u32 = 2;
    /// 10 - 0.00%
    pub const ID_PERCENT_DEC2: u32 = 10;
    /// 14 - m/d/yy
    pub const ID_DATE_SHORT: u32 = 14;
    /// 22 - m/d/yy h:mm
    pub const ID_DATETIME: u32 = 22;
    /// 49 - @
    pub const ID_TEXT: u32 = 49;

    pub fn from_string<S: Into<String>>(format: S) -> Self {
        NumberFormat::Custom(format.into())
    }

    pub fn from_id(id: u32) -> Self {
        NumberFormat::BuiltIn(id)
    }

    /// The format code, if known
    pub fn format_string(&self) -> Option<&str> {
        match self {
            NumberFormat::General => Some("General"),
            NumberFormat::BuiltIn(id) => builtin_format_string(*id),
            NumberFormat::Custom(s) => Some(s),
        }
    }

    /// The fixed id this format resolves to without interning, if any.
    ///
    /// Custom codes that spell a built-in format resolve to its id.
    pub fn builtin_id(&self) -> Option<u32> {
        match self {
            NumberFormat::General => Some(Self::ID_GENERAL),
            NumberFormat::BuiltIn(id) => Some(*id),
            NumberFormat::Custom(code) if code.is_empty() => Some(Self::ID_GENERAL),
            NumberFormat::Custom(code) => builtin_id_for(code),
        }
    }
}

/// Built-in format code by id
pub fn builtin_format_string(id: u32) -> Option<&'static str> {
    BUILTIN_FORMATS
        .iter()
        .find(|(builtin, _)| *builtin == id)
        .map(|(_, code)| *code)
}

fn builtin_id_for(code: &str) -> Option<u32> {
    BUILTIN_FORMATS
        .iter()
        .find(|(_, builtin)| *builtin == code)
        .map(|(id, _)| *id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookup() {
        assert_eq!(builtin_format_string(49), Some("@"));
        assert_eq!(builtin_format_string(30), None);
        assert_eq!(NumberFormat::from_string("0.00%").builtin_id(), Some(10));
        assert_eq!(NumberFormat::from_string("General").builtin_id(), Some(0));
        assert_eq!(NumberFormat::from_string("general").builtin_id(), None);
        assert_eq!(NumberFormat::from_string("0.00E+00").builtin_id(), Some(11));
        assert_eq!(NumberFormat::from_string("0.00e+00").builtin_id(), None);
        assert_eq!(NumberFormat::from_string("0.000").builtin_id(), None);
        assert_eq!(NumberFormat::BuiltIn(3).builtin_id(), Some(3));
    }

    #[test]
    fn test_builtins_are_below_custom_range() {
        assert!(BUILTIN_FORMATS
            .iter()
            .all(|(id, _)| *id < NumberFormat::FIRST_CUSTOM_ID));
    }
}
