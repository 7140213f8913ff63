pub mod error;
pub use error::AppError;

pub mod config;

pub mod logging;
pub use logging::Logger;

pub mod controller {

    pub mod actions;
    pub use actions::{Action, Flow, Key};

    pub mod tasks;
    pub use tasks::{Task, TaskKey};

    pub mod context;
    pub use context::AppContext;

    pub mod listing;

    pub mod categories;

    pub mod details;

    pub mod widgets;

    pub mod storefront;
    pub use storefront::{Storefront, StorefrontBuilder, StorefrontStats};

    pub mod terminal_input;
    pub use terminal_input::{Focusable, TerminalInput};
}

pub mod loader {
    pub mod data_loader;
    pub use data_loader::{CatalogSource, DataLoader, LoadOutcome, SiteSource, StaticSource};
}

pub mod model {
    pub mod book;
    pub use book::{Book, BookId, DisplayValue};

    pub mod catalog;
    pub use catalog::{CatalogStore, ViewFilter};

    pub mod location;
    pub use location::{Location, Page};

    pub mod preferences;
    pub use preferences::{LocalStorage, Theme};

    pub mod ui_state;
    pub use ui_state::{DownloadPhase, FormFeedback, MenuPhase, SubmitPhase, UIState};
}

pub mod operators {
    pub mod download;
    pub use download::{DownloadRequest, DownloadSink, FsDownloadSink};

    pub mod submission;
    pub use submission::{FormData, SimulatedGateway, SubmissionGateway};
}

pub mod search {
    pub mod engine;
    pub use engine::CategoryFilter;
}

pub mod util {
    pub mod debounce;

    pub mod scheduler;
    pub use scheduler::{Clock, ManualClock, MonotonicClock, Scheduler};
}

pub mod view {
    pub mod card;

    pub mod dom;
    pub use dom::{Document, Element, ElementId, Node};

    pub mod markup;

    pub mod theme;

    pub mod ui;
    pub use ui::UIRenderer;

    pub mod components {
        pub mod overlays;
        pub use overlays::{BannerOverlay, MenuOverlay};
        pub mod page_view;
        pub use page_view::PageView;
        pub mod status_bar;
        pub use status_bar::StatusBar;
    }
}

pub use controller::{Action, Storefront};
