//! HTML rendering with minijinja.
//!
//! Templates are compiled into the binary. Every page extends `base.html`,
//! which carries the page configuration (title, icon, wide layout) and the
//! global stylesheet, so nothing can be emitted ahead of it. Auto-escaping is
//! on for `.html` templates, which covers all user and AI supplied text.

use minijinja::Environment;
use reportchat_core::view::{FormSlot, ViewState, visible_messages};
use reportchat_core::{AnalysisSession, Message, Role, User};
use serde::Serialize;

use crate::config::AppBranding;

const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../templates/base.html")),
    ("index.html", include_str!("../templates/index.html")),
    ("login.html", include_str!("../templates/login.html")),
    ("greeting.html", include_str!("../templates/greeting.html")),
    ("sidebar.html", include_str!("../templates/sidebar.html")),
    ("welcome.html", include_str!("../templates/welcome.html")),
    ("chat.html", include_str!("../templates/chat.html")),
    ("analysis_form.html", include_str!("../templates/analysis_form.html")),
    ("analysis_fields.html", include_str!("../templates/analysis_fields.html")),
    ("footer.html", include_str!("../templates/footer.html")),
];

pub struct Renderer {
    env: Environment<'static>,
    branding: AppBranding,
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer").field("branding", &self.branding).finish_non_exhaustive()
    }
}

impl Renderer {
    pub fn new(branding: AppBranding) -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        for &(name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Self { env, branding })
    }

    pub fn render_page(&self, page: &Page) -> Result<String, minijinja::Error> {
        let ctx = PageContext {
            app: &self.branding,
            version: env!("CARGO_PKG_VERSION"),
            page,
        };
        self.env.get_template("index.html")?.render(&ctx)
    }
}

#[derive(Serialize)]
struct PageContext<'a> {
    app: &'a AppBranding,
    version: &'static str,
    page: &'a Page,
}

/// Everything one render pass of `/` shows.
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    pub view: ViewState,
    /// Greeting + sidebar content; `None` on the login screen.
    pub chrome: Option<Chrome>,
    pub current_session: Option<SessionLink>,
    pub history: Vec<MessageView>,
    pub analysis_form: Option<FormSlot>,
    pub show_chat_input: bool,
    /// Inline error shown above the main area.
    pub error: Option<String>,
    /// Which login form tab to open.
    pub auth_mode: AuthMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMode {
    Login,
    Register,
}

#[derive(Debug, Clone, Serialize)]
pub struct Chrome {
    pub display_name: String,
    pub sessions: Vec<SessionLink>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionLink {
    pub id: String,
    pub title: String,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageView {
    /// `"user"` or `"assistant"`; selects the bubble style.
    pub kind: &'static str,
    pub content: String,
}

impl Page {
    /// Assemble a page for `view`. `history` is the full stored list; system
    /// messages are filtered out here.
    pub fn new(
        view: ViewState,
        user: Option<&User>,
        sessions: &[AnalysisSession],
        current: Option<&AnalysisSession>,
        history: &[Message],
    ) -> Self {
        let current_id = current.map(|s| s.id.as_str());
        let chrome = match (view.shows_chrome(), user) {
            (true, Some(user)) => Some(Chrome {
                display_name: user.display_name().to_owned(),
                sessions: sessions
                    .iter()
                    .map(|s| SessionLink {
                        id: s.id.clone(),
                        title: s.title.clone(),
                        active: Some(s.id.as_str()) == current_id,
                    })
                    .collect(),
            }),
            _ => None,
        };
        let in_session = matches!(view, ViewState::SessionNoMessages | ViewState::SessionWithMessages);
        Self {
            view,
            chrome,
            current_session: current.filter(|_| in_session).map(|s| SessionLink {
                id: s.id.clone(),
                title: s.title.clone(),
                active: true,
            }),
            history: if in_session {
                visible_messages(history)
                    .map(|m| MessageView {
                        kind: if m.role == Role::User { "user" } else { "assistant" },
                        content: m.content.clone(),
                    })
                    .collect()
            } else {
                Vec::new()
            },
            analysis_form: view.analysis_form(),
            show_chat_input: view.shows_chat_input(),
            error: None,
            auth_mode: AuthMode::Login,
        }
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn with_auth_mode(mut self, mode: AuthMode) -> Self {
        self.auth_mode = mode;
        self
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use reportchat_core::report::wrap_report_text;

    fn renderer() -> Renderer {
        Renderer::new(AppBranding::default()).unwrap()
    }

    fn user() -> User {
        User { id: "u1".into(), name: "Ada <admin>".into(), email: "ada@example.com".into() }
    }

    fn session() -> AnalysisSession {
        AnalysisSession { id: "s1".into(), title: "Sales".into(), created_at: chrono::Utc::now() }
    }

    #[test]
    fn login_page_has_no_chrome() {
        let page = Page::new(ViewState::Unauthenticated, None, &[], None, &[]);
        let html = renderer().render_page(&page).unwrap();
        assert!(html.contains("id=\"login\""));
        assert!(html.contains("id=\"footer\""));
        assert!(!html.contains("id=\"sidebar\""));
        assert!(!html.contains("id=\"greeting\""));
    }

    #[test]
    fn welcome_page_is_the_only_main_view() {
        let page = Page::new(ViewState::NoSession, Some(&user()), &[session()], None, &[]);
        let html = renderer().render_page(&page).unwrap();
        assert!(html.contains("id=\"welcome\""));
        assert!(html.contains("id=\"sidebar\""));
        assert!(!html.contains("id=\"login\""));
        assert!(!html.contains("id=\"chat-history\""));
        assert!(!html.contains("id=\"analysis-form\""));
    }

    #[test]
    fn greeting_escapes_display_name() {
        let page = Page::new(ViewState::NoSession, Some(&user()), &[], None, &[]);
        let html = renderer().render_page(&page).unwrap();
        assert!(html.contains("Hi, Ada &lt;admin&gt;"));
    }

    #[test]
    fn chat_view_hides_system_messages_and_collapses_form() {
        let history = vec![
            Message::system(wrap_report_text("SECRET")),
            Message::assistant("the report"),
            Message::user("why?"),
        ];
        let s = session();
        let page = Page::new(ViewState::SessionWithMessages, Some(&user()), &[s.clone()], Some(&s), &history);
        assert_eq!(page.history.len(), 2);

        let html = renderer().render_page(&page).unwrap();
        assert!(!html.contains("SECRET"));
        assert!(html.contains("msg-assistant"));
        assert!(html.contains("msg-user"));
        assert!(html.contains("id=\"chat-input\""));
        assert!(html.contains("<details id=\"analysis-form\""));
    }

    #[test]
    fn empty_session_shows_open_analysis_form_without_chat_input() {
        let s = session();
        let page = Page::new(ViewState::SessionNoMessages, Some(&user()), &[s.clone()], Some(&s), &[]);
        let html = renderer().render_page(&page).unwrap();
        assert!(html.contains("<section id=\"analysis-form\""));
        assert!(!html.contains("id=\"chat-input\""));
    }

    #[test]
    fn inline_error_is_rendered() {
        let page = Page::new(ViewState::NoSession, Some(&user()), &[], None, &[])
            .with_error("Failed to create session");
        let html = renderer().render_page(&page).unwrap();
        assert!(html.contains("Failed to create session"));
    }
}
