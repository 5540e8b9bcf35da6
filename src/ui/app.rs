use crossterm::event::{KeyCode, KeyModifiers};

use crate::analyze::{AnalysisResult, IssueRequest};
use crate::error::{backend_failure, issue_not_found, UserError};

use super::analysis::ParsedAnalysis;
use super::backend::SubmitOutcome;

/// The three screens of the wizard. A result screen always carries its result.
#[derive(Debug, Clone, PartialEq)]
pub enum Page {
    Home,
    Form,
    Result(ResultPage),
}

/// Moves between pages
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    GetStarted,
    Back,
    Analyzed(AnalysisResult),
    AnalyzeAnother,
    GoHome,
}

impl Page {
    /// Apply a transition; pairs not listed leave the page unchanged
    pub fn apply(self, transition: Transition) -> Page {
        match (self, transition) {
            (Page::Home, Transition::GetStarted) => Page::Form,
            (Page::Form, Transition::Back) => Page::Home,
            (Page::Form, Transition::Analyzed(result)) => Page::Result(ResultPage::new(result)),
            (Page::Result(_), Transition::AnalyzeAnother) => Page::Form,
            (Page::Result(_), Transition::GoHome) => Page::Home,
            (page, _) => page,
        }
    }
}

/// Which tab of the result screen is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultTab {
    Summary,
    Json,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultPage {
    pub result: AnalysisResult,
    pub parsed: ParsedAnalysis,
    pub tab: ResultTab,
    pub scroll: u16,
}

impl ResultPage {
    fn new(result: AnalysisResult) -> Self {
        let parsed = ParsedAnalysis::parse(&result.analysis);
        ResultPage {
            result,
            parsed,
            tab: ResultTab::Summary,
            scroll: 0,
        }
    }

    fn toggle_tab(&mut self) {
        self.tab = match self.tab {
            ResultTab::Summary => ResultTab::Json,
            ResultTab::Json => ResultTab::Summary,
        };
        self.scroll = 0;
    }
}

/// Which field is focused on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    RepoUrl,
    IssueNumber,
}

impl FormField {
    fn next(self) -> Self {
        match self {
            FormField::RepoUrl => FormField::IssueNumber,
            FormField::IssueNumber => FormField::RepoUrl,
        }
    }
}

/// Message shown under the form after a failed submission
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Warning(UserError),
    Error(UserError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    pub field: FormField,
    pub repo_url: String,
    pub issue_number: String,
    pub notice: Option<Notice>,
}

impl FormState {
    fn new() -> Self {
        FormState {
            field: FormField::RepoUrl,
            repo_url: String::new(),
            issue_number: String::new(),
            notice: None,
        }
    }

    fn active_text_mut(&mut self) -> &mut String {
        match self.field {
            FormField::RepoUrl => &mut self.repo_url,
            FormField::IssueNumber => &mut self.issue_number,
        }
    }

    /// Validate the inputs into a request
    fn request(&self) -> Result<IssueRequest, UserError> {
        let repo_url = self.repo_url.trim();
        let issue_number = self.issue_number.trim();

        if repo_url.is_empty() || issue_number.is_empty() {
            return Err(UserError::new(
                "Please provide both repository URL and issue number.",
            ));
        }

        match issue_number.trim_start_matches('#').parse::<u64>() {
            Ok(number) if number > 0 => Ok(IssueRequest {
                repo_url: repo_url.to_string(),
                issue_number: number,
            }),
            _ => Err(UserError::new(format!("Invalid issue number: {}", issue_number))
                .with_suggestion("Use a positive number such as 123.")),
        }
    }
}

/// What the event loop should do after a key press
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    None,
    Submit(IssueRequest),
}

pub struct App {
    pub page: Page,
    pub form: FormState,
    /// Set while a submission is in flight
    pub busy: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new() -> Self {
        App {
            page: Page::Home,
            form: FormState::new(),
            busy: false,
            should_quit: false,
        }
    }

    fn transition(&mut self, transition: Transition) {
        let page = std::mem::replace(&mut self.page, Page::Home);
        self.page = page.apply(transition);
    }

    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> Action {
        if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return Action::None;
        }

        match self.page {
            Page::Home => self.handle_home_key(code),
            Page::Form => self.handle_form_key(code),
            Page::Result(_) => self.handle_result_key(code),
        }
    }

    fn handle_home_key(&mut self, code: KeyCode) -> Action {
        match code {
            KeyCode::Enter | KeyCode::Char('s') => {
                self.form.notice = None;
                self.transition(Transition::GetStarted);
            }
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            _ => {}
        }
        Action::None
    }

    fn handle_form_key(&mut self, code: KeyCode) -> Action {
        match code {
            KeyCode::Esc => {
                self.form.notice = None;
                self.transition(Transition::Back);
            }
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.form.field = self.form.field.next();
            }
            KeyCode::Backspace => {
                self.form.active_text_mut().pop();
            }
            KeyCode::Char(c) => {
                self.form.active_text_mut().push(c);
            }
            KeyCode::Enter => match self.form.request() {
                Ok(request) => {
                    self.form.notice = None;
                    return Action::Submit(request);
                }
                Err(error) => self.form.notice = Some(Notice::Error(error)),
            },
            _ => {}
        }
        Action::None
    }

    fn handle_result_key(&mut self, code: KeyCode) -> Action {
        match code {
            KeyCode::Char('a') => {
                self.form.notice = None;
                self.transition(Transition::AnalyzeAnother);
            }
            KeyCode::Char('h') => self.transition(Transition::GoHome),
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            _ => {
                if let Page::Result(ref mut page) = self.page {
                    match code {
                        KeyCode::Tab | KeyCode::BackTab | KeyCode::Left | KeyCode::Right => {
                            page.toggle_tab()
                        }
                        KeyCode::Down | KeyCode::Char('j') => {
                            page.scroll = page.scroll.saturating_add(1)
                        }
                        KeyCode::Up | KeyCode::Char('k') => {
                            page.scroll = page.scroll.saturating_sub(1)
                        }
                        _ => {}
                    }
                }
            }
        }
        Action::None
    }

    /// Apply the answer of a submission made from the form
    pub fn apply_outcome(&mut self, outcome: SubmitOutcome) {
        self.busy = false;
        match outcome {
            SubmitOutcome::Analyzed(result) => self.transition(Transition::Analyzed(result)),
            SubmitOutcome::NotFound => self.form.notice = Some(Notice::Warning(issue_not_found())),
            SubmitOutcome::Failed(status) => {
                self.form.notice = Some(Notice::Error(backend_failure(status)))
            }
            SubmitOutcome::Transport(error) => self.form.notice = Some(Notice::Error(error)),
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_result, sample_analysis};

    fn press(app: &mut App, code: KeyCode) -> Action {
        app.handle_key(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn app_on_form() -> App {
        let mut app = App::new();
        press(&mut app, KeyCode::Enter);
        app
    }

    fn app_on_result(analysis: &str) -> App {
        let mut app = app_on_form();
        app.apply_outcome(SubmitOutcome::Analyzed(create_test_result(analysis)));
        app
    }

    #[test]
    fn transition_table() {
        let result = create_test_result("{}");

        assert_eq!(Page::Home.apply(Transition::GetStarted), Page::Form);
        assert_eq!(Page::Form.apply(Transition::Back), Page::Home);
        assert!(matches!(
            Page::Form.apply(Transition::Analyzed(result.clone())),
            Page::Result(_)
        ));

        let on_result = Page::Form.apply(Transition::Analyzed(result.clone()));
        assert_eq!(on_result.clone().apply(Transition::AnalyzeAnother), Page::Form);
        assert_eq!(on_result.apply(Transition::GoHome), Page::Home);

        // Not in the table
        assert_eq!(
            Page::Home.apply(Transition::Analyzed(result)),
            Page::Home
        );
        assert_eq!(Page::Home.apply(Transition::AnalyzeAnother), Page::Home);
        assert_eq!(Page::Form.apply(Transition::GoHome), Page::Form);
    }

    #[test]
    fn quit_keys() {
        let mut app = App::new();
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);

        let mut app = app_on_form();
        app.handle_key(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(app.should_quit);
    }

    #[test]
    fn q_is_text_on_form() {
        let mut app = app_on_form();
        type_text(&mut app, "q");
        assert!(!app.should_quit);
        assert_eq!(app.form.repo_url, "q");
    }

    #[test]
    fn form_editing_and_focus() {
        let mut app = app_on_form();
        type_text(&mut app, "octocat/Hello-Worldx");
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "42");

        assert_eq!(app.form.repo_url, "octocat/Hello-World");
        assert_eq!(app.form.issue_number, "42");
        assert_eq!(app.form.field, FormField::IssueNumber);
    }

    #[test]
    fn submit_builds_request() {
        let mut app = app_on_form();
        type_text(&mut app, "https://github.com/octocat/Hello-World");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "1");

        let action = press(&mut app, KeyCode::Enter);
        assert_eq!(
            action,
            Action::Submit(IssueRequest {
                repo_url: "https://github.com/octocat/Hello-World".to_string(),
                issue_number: 1,
            })
        );
        assert_eq!(app.page, Page::Form);
    }

    #[test]
    fn submit_requires_both_fields() {
        let mut app = app_on_form();
        type_text(&mut app, "octocat/Hello-World");

        let action = press(&mut app, KeyCode::Enter);
        assert_eq!(action, Action::None);
        match &app.form.notice {
            Some(Notice::Error(error)) => assert_eq!(
                error.message(),
                "Please provide both repository URL and issue number."
            ),
            other => panic!("unexpected notice {:?}", other),
        }
    }

    #[test]
    fn submit_rejects_non_numeric_issue() {
        let mut app = app_on_form();
        type_text(&mut app, "octocat/Hello-World");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "abc");

        assert_eq!(press(&mut app, KeyCode::Enter), Action::None);
        assert!(matches!(app.form.notice, Some(Notice::Error(_))));

        // Zero is not an issue number either
        app.form.issue_number = "0".to_string();
        assert_eq!(press(&mut app, KeyCode::Enter), Action::None);
    }

    #[test]
    fn success_moves_to_result() {
        let app = app_on_result(&sample_analysis("bug"));

        match &app.page {
            Page::Result(page) => {
                assert_eq!(page.tab, ResultTab::Summary);
                assert!(matches!(page.parsed, ParsedAnalysis::Structured(_)));
            }
            other => panic!("unexpected page {:?}", other),
        }
    }

    #[test]
    fn not_found_stays_on_form_with_warning() {
        let mut app = app_on_form();
        app.busy = true;
        app.apply_outcome(SubmitOutcome::NotFound);

        assert_eq!(app.page, Page::Form);
        assert!(!app.busy);
        assert!(matches!(app.form.notice, Some(Notice::Warning(_))));
    }

    #[test]
    fn failures_stay_on_form_with_error() {
        let mut app = app_on_form();
        app.apply_outcome(SubmitOutcome::Failed(500));
        assert_eq!(app.page, Page::Form);
        assert!(matches!(app.form.notice, Some(Notice::Error(_))));

        app.apply_outcome(SubmitOutcome::Transport(UserError::new(
            "Request failed: connection refused",
        )));
        match &app.form.notice {
            Some(Notice::Error(error)) => {
                assert_eq!(error.message(), "Request failed: connection refused")
            }
            other => panic!("unexpected notice {:?}", other),
        }
    }

    #[test]
    fn result_navigation() {
        let mut app = app_on_result("not json");
        press(&mut app, KeyCode::Tab);
        match &app.page {
            Page::Result(page) => assert_eq!(page.tab, ResultTab::Json),
            other => panic!("unexpected page {:?}", other),
        }

        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.page, Page::Form);

        let mut app = app_on_result("not json");
        press(&mut app, KeyCode::Char('h'));
        assert_eq!(app.page, Page::Home);
    }

    #[test]
    fn back_from_form_goes_home() {
        let mut app = app_on_form();
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.page, Page::Home);
        assert!(!app.should_quit);
    }
}
