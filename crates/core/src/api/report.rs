/// Which server-rendered export to download.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportKind {
    Loan,
    Expense,
    Investment,
    Profit,
}

impl ReportKind {
    fn path_prefix(&self) -> &'static str {
        match self {
            ReportKind::Loan => "loan",
            ReportKind::Expense => "expense",
            ReportKind::Investment => "investment",
            ReportKind::Profit => "profit",
        }
    }

    /// Endpoint path relative to the API base URL.
    pub fn path(&self, format: ReportFormat) -> String {
        format!("{}/download/{}", self.path_prefix(), format.path_segment())
    }

    /// Suggested file name for the downloaded export.
    pub fn file_name(&self, format: ReportFormat) -> String {
        match self {
            ReportKind::Loan => format!("Loan_Collection.{}", format.extension()),
            other => format!("{}_report.{}", other.path_prefix(), format.extension()),
        }
    }
}

impl std::fmt::Display for ReportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path_prefix())
    }
}

impl std::str::FromStr for ReportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "loan" | "loans" => Ok(ReportKind::Loan),
            "expense" | "expenses" => Ok(ReportKind::Expense),
            "investment" | "investments" => Ok(ReportKind::Investment),
            "profit" => Ok(ReportKind::Profit),
            other => Err(format!("unknown report kind '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportFormat {
    Excel,
    Pdf,
}

impl ReportFormat {
    fn path_segment(&self) -> &'static str {
        match self {
            ReportFormat::Excel => "excel",
            ReportFormat::Pdf => "pdf",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Excel => "xlsx",
            ReportFormat::Pdf => "pdf",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ReportFormat::Excel => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ReportFormat::Pdf => "application/pdf",
        }
    }
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "excel" | "xlsx" => Ok(ReportFormat::Excel),
            "pdf" => Ok(ReportFormat::Pdf),
            other => Err(format!("unknown report format '{other}'")),
        }
    }
}

/// A downloaded export, ready to be written wherever the caller wants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub kind: ReportKind,
    pub format: ReportFormat,
    pub bytes: Vec<u8>,
    pub file_name: String,
}

impl Report {
    pub fn new(kind: ReportKind, format: ReportFormat, bytes: Vec<u8>) -> Self {
        Self {
            kind,
            format,
            bytes,
            file_name: kind.file_name(format),
        }
    }

    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }
}
