//! Root application component
//!
//! The App struct implements the Component trait, acting as the root component
//! that delegates event handling and rendering to the current page and the
//! modal overlays. It owns routing and the shared country repository.

use crate::action::Action;
use crate::component::Component;
use crate::components::{
    calculate_page_layout, AnalysisPage, ContextMenu, ExamplePage, HelpDialog, LandingPage,
    QuitDialog,
};
use crate::config::Config;
use crate::model::modal::{Modal, ModalStack};
use crate::model::TableAction;
use crate::router::Route;
use crate::services::CountryRepository;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use std::sync::Arc;

// ═══════════════════════════════════════════════════════════════════════════════
// Pages
// ═══════════════════════════════════════════════════════════════════════════════

/// The page shown for the current route
pub enum Page {
    Landing(LandingPage),
    Example(ExamplePage),
    Analysis(Box<AnalysisPage>),
}

impl Page {
    fn component(&mut self) -> &mut dyn Component {
        match self {
            Page::Landing(page) => page,
            Page::Example(page) => page,
            Page::Analysis(page) => page.as_mut(),
        }
    }

    fn hint(&self) -> &'static str {
        match self {
            Page::Landing(_) => " ↑↓ choose · Enter open · ? help · q quit",
            Page::Example(_) => " Backspace back · ? help · q quit",
            Page::Analysis(_) => {
                " Tab switch table · ]/[ step · Space select · Enter/click details · m/right click menu · ? help"
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// App Struct
// ═══════════════════════════════════════════════════════════════════════════════

/// Main application state - coordinates between pages and modals
pub struct App {
    config: Config,
    repository: Arc<dyn CountryRepository>,

    pub route: Route,
    pub page: Page,

    /// Modal overlay stack
    pub modals: ModalStack,
    quit_dialog: QuitDialog,
    help_dialog: HelpDialog,
    context_menu: Option<ContextMenu>,

    /// Flag to indicate the app should quit
    pub should_quit: bool,
}

impl App {
    pub fn new(config: Config, repository: Arc<dyn CountryRepository>) -> App {
        let route = Route::parse(&config.initial_route);
        let help_dialog = HelpDialog::new(config.mouse_actions.clone());
        let mut app = App {
            page: Page::Landing(LandingPage::default()),
            route: Route::Landing,
            config,
            repository,
            modals: ModalStack::new(),
            quit_dialog: QuitDialog::default(),
            help_dialog,
            context_menu: None,
            should_quit: false,
        };
        app.page = app.build_page(&route);
        app.route = route;
        app
    }

    fn build_page(&self, route: &Route) -> Page {
        match route {
            Route::Landing => Page::Landing(LandingPage::default()),
            Route::Example { name } => Page::Example(ExamplePage::new(name.clone())),
            Route::Analysis { name } => Page::Analysis(Box::new(AnalysisPage::new(
                name.clone(),
                Arc::clone(&self.repository),
                self.config.root_ids.clone(),
                self.config.enable_multiple_action,
                self.config.mouse_actions.clone(),
            ))),
        }
    }

    fn navigate(&mut self, path: &str) -> Result<()> {
        let route = Route::parse(path);
        log::info!("navigating to {}", route.path());
        self.page = self.build_page(&route);
        self.route = route;
        self.modals = ModalStack::new();
        self.context_menu = None;
        self.page.component().init()
    }

    /// Actions applicable to `row_id` on the current page
    fn contextual_actions(&self, row_id: &str) -> Vec<TableAction> {
        match &self.page {
            Page::Analysis(page) => page.contextual_actions(row_id),
            _ => Vec::new(),
        }
    }

    fn open_context_menu(&mut self, row_id: String, screen_x: u16, screen_y: u16) {
        let actions = self.contextual_actions(&row_id);
        if actions.is_empty() {
            log::debug!("no contextual actions for row {}", row_id);
            return;
        }
        self.context_menu = Some(ContextMenu::new(row_id.clone(), actions, screen_x, screen_y));
        self.modals.open_context_menu(Modal::ContextMenu {
            row_id,
            screen_x,
            screen_y,
        });
    }

    fn close_modal(&mut self) {
        if let Some(Modal::ContextMenu { .. }) = self.modals.pop() {
            self.context_menu = None;
        }
    }

    fn handle_global_key(&self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::ForceQuit)
            }
            KeyCode::Char('q') => Some(Action::OpenQuitDialog),
            KeyCode::Char('?') => Some(Action::OpenHelp),
            _ => None,
        }
    }

    fn handle_modal_key_event(&mut self, modal: &Modal, key: KeyEvent) -> Result<Option<Action>> {
        match modal {
            Modal::QuitConfirm => self.quit_dialog.handle_key_event(key),
            Modal::Help => self.help_dialog.handle_key_event(key),
            Modal::ContextMenu { .. } => match self.context_menu.as_mut() {
                Some(menu) => menu.handle_key_event(key),
                None => Ok(Some(Action::CloseModal)),
            },
        }
    }

    fn draw_modal(&mut self, frame: &mut Frame, area: Rect, modal: &Modal) -> Result<()> {
        match modal {
            Modal::QuitConfirm => self.quit_dialog.draw(frame, area)?,
            Modal::Help => self.help_dialog.draw(frame, area)?,
            Modal::ContextMenu { .. } => {
                if let Some(menu) = self.context_menu.as_mut() {
                    menu.draw(frame, area)?;
                }
            }
        }
        Ok(())
    }

    fn draw_header(&self, frame: &mut Frame, area: Rect) {
        let header = Line::from(vec![
            Span::styled(
                " dq-tui ",
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" #{}", self.route.path()),
                Style::default().fg(Color::DarkGray),
            ),
        ]);
        frame.render_widget(Paragraph::new(header), area);
    }
}

impl Component for App {
    fn init(&mut self) -> Result<()> {
        self.page.component().init()
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if let Some(modal) = self.modals.top().cloned() {
            return self.handle_modal_key_event(&modal, key);
        }

        // page-level popups get the key first
        if let Page::Analysis(page) = &self.page {
            if page.details().is_some() {
                return self.page.component().handle_key_event(key);
            }
        }

        if let Some(action) = self.handle_global_key(key) {
            return Ok(Some(action));
        }
        self.page.component().handle_key_event(key)
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        match self.modals.top() {
            Some(Modal::ContextMenu { .. }) => match self.context_menu.as_mut() {
                Some(menu) => menu.handle_mouse_event(mouse),
                None => Ok(Some(Action::CloseModal)),
            },
            Some(Modal::Help) => self.help_dialog.handle_mouse_event(mouse),
            Some(Modal::QuitConfirm) => self.quit_dialog.handle_mouse_event(mouse),
            None => self.page.component().handle_mouse_event(mouse),
        }
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            // ─────────────────────────────────────────────────────────────────
            // App Lifecycle
            // ─────────────────────────────────────────────────────────────────
            Action::ForceQuit => {
                self.should_quit = true;
            }
            Action::Resize(_, _) => {}
            Action::Navigate(path) => self.navigate(&path)?,

            // ─────────────────────────────────────────────────────────────────
            // Modals
            // ─────────────────────────────────────────────────────────────────
            Action::OpenQuitDialog => self.modals.push(Modal::QuitConfirm),
            Action::OpenHelp => {
                self.help_dialog.scroll_offset = 0;
                self.modals.push(Modal::Help);
            }
            Action::CloseModal if !self.modals.is_empty() => self.close_modal(),
            Action::OpenContextualMenu {
                row_id,
                screen_y,
                screen_x,
            } => self.open_context_menu(row_id, screen_x, screen_y),
            Action::RunTableAction { .. } => {
                if let Some(Modal::ContextMenu { .. }) = self.modals.top() {
                    self.close_modal();
                }
                return self.page.component().update(action);
            }

            // ─────────────────────────────────────────────────────────────────
            // Everything else belongs to the page
            // ─────────────────────────────────────────────────────────────────
            other => return self.page.component().update(other),
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let layout = calculate_page_layout(area);

        self.draw_header(frame, layout.header);
        self.page.component().draw(frame, layout.body)?;
        frame.render_widget(
            Paragraph::new(Span::styled(
                self.page.hint(),
                Style::default().fg(Color::DarkGray),
            )),
            layout.footer,
        );

        if let Some(modal) = self.modals.top().cloned() {
            self.draw_modal(frame, area, &modal)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::repository::tests::sample_repository;
    use crate::services::InMemoryCountryRepository;

    fn app(route: &str) -> App {
        let config = Config {
            initial_route: route.to_string(),
            ..Config::default()
        };
        App::new(config, Arc::new(InMemoryCountryRepository::default()))
    }

    #[test]
    fn test_initial_route_selects_page() {
        assert!(matches!(app("/").page, Page::Landing(_)));
        assert!(matches!(app("/for/Ada").page, Page::Example(_)));
        assert!(matches!(app("#/analysis").page, Page::Analysis(_)));
    }

    #[test]
    fn test_navigate_replaces_page_and_clears_modals() {
        let mut app = app("/");
        app.update(Action::OpenHelp).unwrap();
        app.update(Action::Navigate("/for".to_string())).unwrap();

        assert_eq!(
            app.route,
            Route::Example {
                name: "Stranger".to_string()
            }
        );
        assert!(app.modals.is_empty());
    }

    #[test]
    fn test_quit_flow() {
        let mut app = app("/");
        let open = app
            .handle_key_event(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE))
            .unwrap();
        assert_eq!(open, Some(Action::OpenQuitDialog));
        app.update(open.unwrap()).unwrap();

        let confirm = app
            .handle_key_event(KeyEvent::new(KeyCode::Char('y'), KeyModifiers::NONE))
            .unwrap();
        app.update(confirm.unwrap()).unwrap();
        assert!(app.should_quit);
    }

    #[test]
    fn test_context_menu_opens_only_with_applicable_actions() {
        let repository = Arc::new(sample_repository());
        let config = Config {
            initial_route: "/analysis".to_string(),
            ..Config::default()
        };
        let mut app = App::new(config, repository.clone());

        let Page::Analysis(page) = &mut app.page else {
            panic!("expected the analysis page");
        };
        page.selector.set_countries(repository.get_roots(&[]).unwrap());

        app.update(Action::OpenContextualMenu {
            row_id: "ke".to_string(),
            screen_y: 3,
            screen_x: 4,
        })
        .unwrap();
        assert!(matches!(app.modals.top(), Some(Modal::ContextMenu { .. })));

        // a second menu replaces the first one
        app.update(Action::OpenContextualMenu {
            row_id: "mw".to_string(),
            screen_y: 5,
            screen_x: 4,
        })
        .unwrap();
        app.close_modal();
        assert!(app.modals.is_empty());

        app.update(Action::OpenContextualMenu {
            row_id: "missing".to_string(),
            screen_y: 0,
            screen_x: 0,
        })
        .unwrap();
        assert!(app.modals.is_empty());
    }

    #[test]
    fn test_running_menu_action_closes_menu() {
        let repository = Arc::new(sample_repository());
        let config = Config {
            initial_route: "/analysis".to_string(),
            ..Config::default()
        };
        let mut app = App::new(config, repository.clone());
        let Page::Analysis(page) = &mut app.page else {
            panic!("expected the analysis page");
        };
        page.selector.set_countries(repository.get_roots(&[]).unwrap());

        app.update(Action::OpenContextualMenu {
            row_id: "ke".to_string(),
            screen_y: 3,
            screen_x: 4,
        })
        .unwrap();
        app.update(Action::RunTableAction {
            name: "select".to_string(),
            ids: vec!["ke".to_string()],
        })
        .unwrap();

        assert!(app.modals.is_empty());
        let Page::Analysis(page) = &app.page else {
            panic!("expected the analysis page");
        };
        assert_eq!(page.selector.selected_ids(), vec!["ke".to_string()]);
    }
}
