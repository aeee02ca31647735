use crate::SearchMatch;
use boardgraph_events::NavigationKey;

/// What a key press on the suggestion list asks the caller to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestionAction {
    None,
    /// Put this label in the search input and run a search for it
    Pick(SearchMatch),
    /// Run a search for whatever is in the input
    Submit,
}

/// Dropdown state for the search input
#[derive(Debug, Clone, Default)]
pub struct SuggestionList {
    items: Vec<SearchMatch>,
    /// `None` means no row is highlighted and Enter submits the raw query.
    selected: Option<usize>,
    visible: bool,
}

impl SuggestionList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_suggestions(&mut self, items: Vec<SearchMatch>) {
        self.visible = !items.is_empty();
        self.items = items;
        self.selected = None;
    }

    pub fn hide(&mut self) {
        self.visible = false;
        self.selected = None;
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.hide();
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn items(&self) -> &[SearchMatch] {
        &self.items
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn handle_key(&mut self, key: NavigationKey) -> SuggestionAction {
        match key {
            NavigationKey::Down => {
                if self.visible && !self.items.is_empty() {
                    let next = self.selected.map_or(0, |i| i + 1);
                    self.selected = Some(next.min(self.items.len() - 1));
                }
                SuggestionAction::None
            }
            NavigationKey::Up => {
                self.selected = match self.selected {
                    None | Some(0) => None,
                    Some(i) => Some(i - 1),
                };
                SuggestionAction::None
            }
            NavigationKey::Enter => match self.selected {
                Some(i) if self.visible => self
                    .pick(i)
                    .map_or(SuggestionAction::Submit, SuggestionAction::Pick),
                _ => SuggestionAction::Submit,
            },
            NavigationKey::Escape => {
                self.hide();
                SuggestionAction::None
            }
        }
    }

    /// Takes the suggestion at `index` and hides the list.
    pub fn pick(&mut self, index: usize) -> Option<SearchMatch> {
        let picked = self.items.get(index).cloned();
        self.hide();
        picked
    }
}
