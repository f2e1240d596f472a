use crate::AutoNumbering;

/// The page a question is rendered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageKind {
    /// Normal survey taking.
    #[default]
    View,
    /// Editor preview.
    Preview,
    /// Report of all responses.
    Report,
    /// Report of the current user's responses.
    MyReport,
}

impl PageKind {
    pub fn is_report(self) -> bool {
        matches!(self, Self::Report | Self::MyReport)
    }
}

/// The report tab that is currently open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportTab {
    /// "My responses", one submission at a time.
    MyByResponse,
    /// "Individual responses", one submission at a time.
    IndividualResponse,
    /// Summary and any other tab.
    Summary,
}

/// What a render pass needs to know about where it happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderContext {
    pub page: PageKind,
    pub tab: Option<ReportTab>,
    pub autonum: AutoNumbering,
}

impl RenderContext {
    pub fn new(autonum: AutoNumbering) -> Self {
        Self {
            page: PageKind::View,
            tab: None,
            autonum,
        }
    }

    pub fn with_page(mut self, page: PageKind) -> Self {
        self.page = page;
        self
    }

    pub fn with_tab(mut self, tab: ReportTab) -> Self {
        self.tab = Some(tab);
        self
    }

    pub fn is_preview(&self) -> bool {
        self.page == PageKind::Preview
    }

    /// Whether question numbers are shown.
    pub fn numbering(&self) -> bool {
        self.autonum.numbers_questions()
    }

    /// Whether unanswered dependent questions start out hidden.
    ///
    /// That is the case in preview, and on single-response report tabs when
    /// numbering is off.
    pub fn hides_dependents(&self) -> bool {
        self.is_preview()
            || (!self.numbering()
                && matches!(
                    self.tab,
                    Some(ReportTab::MyByResponse | ReportTab::IndividualResponse)
                ))
    }
}
