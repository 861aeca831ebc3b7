use crate::mvi::Reducer;
use crate::ui::intent::UiIntent;
use crate::ui::state::ShellState;

pub struct UiReducer;

impl Reducer for UiReducer {
    type State = ShellState;
    type Intent = UiIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            UiIntent::ToggleTheme => ShellState {
                theme: state.theme.toggled(),
                ..state
            },
            UiIntent::SetTheme(theme) => ShellState { theme, ..state },
            UiIntent::ToggleSidebar => ShellState {
                sidebar_open: !state.sidebar_open,
                ..state
            },
            UiIntent::SetSidebar(sidebar_open) => ShellState {
                sidebar_open,
                ..state
            },
            UiIntent::SetViewMode(view_mode) => ShellState { view_mode, ..state },
            UiIntent::SetGridColumns(grid_columns) => ShellState {
                grid_columns,
                ..state
            },
            UiIntent::AddNotification(notification) => {
                let mut notifications = state.notifications;
                notifications.push(notification);
                ShellState {
                    notifications,
                    ..state
                }
            }
            UiIntent::RemoveNotification { id } => {
                let mut notifications = state.notifications;
                notifications.retain(|n| n.id != id);
                ShellState {
                    notifications,
                    ..state
                }
            }
            UiIntent::ClearNotifications => ShellState {
                notifications: Vec::new(),
                ..state
            },
            UiIntent::OpenModal { kind, data } => ShellState {
                active_modal: Some(kind),
                modal_data: data,
                ..state
            },
            UiIntent::CloseModal { kind } if state.active_modal == Some(kind) => ShellState {
                active_modal: None,
                modal_data: None,
                ..state
            },
            UiIntent::CloseModal { .. } => state,
        }
    }
}
