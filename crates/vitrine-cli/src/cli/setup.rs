use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use vitrine::prefs::{Animation, Theme};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ThemeChoice {
    Light,
    Dark,
}

impl From<ThemeChoice> for Theme {
    fn from(choice: ThemeChoice) -> Self {
        match choice {
            ThemeChoice::Light => Theme::Light,
            ThemeChoice::Dark => Theme::Dark,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum AnimChoice {
    Smooth,
    Reduced,
}

impl From<AnimChoice> for Animation {
    fn from(choice: AnimChoice) -> Self {
        match choice {
            AnimChoice::Smooth => Animation::Smooth,
            AnimChoice::Reduced => Animation::Reduced,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "vitrine",
    bin_name = "vitrine",
    version,
    disable_help_subcommand = true,
    about = "A local archive for collections: categories, items, favorites",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Data directory (defaults to $VITRINE_DATA, then the OS data directory)
    #[arg(long, global = true, value_name = "DIR", help_heading = "Options")]
    pub data: Option<PathBuf>,

    /// PIN used to open a locked archive
    #[arg(
        long,
        global = true,
        env = "VITRINE_PIN",
        hide_env_values = true,
        help_heading = "Options"
    )]
    pub pin: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List categories
    #[command(alias = "ls", display_order = 1)]
    Categories {
        /// Only categories whose name or description matches
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Add, edit, remove or show a category
    #[command(alias = "cat", display_order = 2)]
    Category {
        #[command(subcommand)]
        action: CategoryCommands,
    },

    /// Add, edit, remove, favorite or list items
    #[command(display_order = 3)]
    Item {
        #[command(subcommand)]
        action: ItemCommands,
    },

    /// Search categories and items across the archive
    #[command(display_order = 4)]
    Search { query: String },

    /// Export the archive as JSON (to the configured file, a path, or `-` for stdout)
    #[command(display_order = 10)]
    Export { path: Option<String> },

    /// Replace the archive with a JSON export
    #[command(display_order = 11)]
    Import { path: PathBuf },

    /// Show or change preferences
    #[command(display_order = 20)]
    Prefs {
        #[command(subcommand)]
        action: Option<PrefsCommands>,
    },

    /// Manage the access PIN
    #[command(display_order = 21)]
    Pin {
        #[command(subcommand)]
        action: PinCommands,
    },

    /// Check a PIN against the stored one
    #[command(display_order = 22)]
    Unlock {
        #[arg(value_name = "PIN")]
        code: String,
    },

    /// Create the data directory and print where everything lives
    #[command(display_order = 30)]
    Init,
}

#[derive(Subcommand, Debug)]
pub enum CategoryCommands {
    /// Create a category
    Add {
        name: String,

        #[arg(short, long)]
        description: Option<String>,
    },

    /// Rename a category or change its description
    Edit {
        /// Category id or position
        category: String,

        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        description: Option<String>,
    },

    /// Delete a category and all of its items
    #[command(alias = "delete")]
    Rm {
        /// Category id or position
        category: String,
    },

    /// Show a category and its items
    Show {
        /// Category id or position
        category: String,
    },
}

/// Optional item fields shared by `item add` and `item edit`.
#[derive(Args, Debug)]
pub struct ItemFields {
    /// Description
    #[arg(long)]
    pub desc: Option<String>,

    /// Link
    #[arg(long)]
    pub url: Option<String>,

    /// Comma separated tags
    #[arg(long = "tags", visible_alias = "tag")]
    pub tags: Option<String>,

    /// Image file, stored inline
    #[arg(long, value_name = "FILE")]
    pub image: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum ItemCommands {
    /// Add an item to a category
    Add {
        /// Category id or position
        category: String,

        /// Title words (joined with spaces)
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,

        #[command(flatten)]
        fields: ItemFields,

        /// Mark the new item as a favorite
        #[arg(long)]
        favorite: bool,
    },

    /// Change an item's fields; unspecified fields are kept
    Edit {
        /// Category id or position
        category: String,

        /// Item id or position
        item: String,

        #[arg(short, long)]
        title: Option<String>,

        #[command(flatten)]
        fields: ItemFields,

        /// Remove the item's image
        #[arg(long, conflicts_with = "image")]
        no_image: bool,
    },

    /// Delete an item
    #[command(alias = "delete")]
    Rm {
        /// Category id or position
        category: String,

        /// Item id or position
        item: String,
    },

    /// Toggle an item's favorite flag
    Fav {
        /// Category id or position
        category: String,

        /// Item id or position
        item: String,
    },

    /// List the items of a category
    #[command(alias = "ls")]
    List {
        /// Category id or position
        category: String,

        /// Only items whose title, description or tags match
        #[arg(short, long)]
        search: Option<String>,

        /// Only favorites
        #[arg(short, long)]
        favorites: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum PrefsCommands {
    /// Print one preference
    Get { key: String },

    /// Change one preference
    Set {
        #[command(subcommand)]
        setting: PrefSetting,
    },
}

#[derive(Subcommand, Debug)]
pub enum PrefSetting {
    /// Color palette for terminal output
    Theme {
        #[arg(value_enum)]
        value: ThemeChoice,
    },

    /// Animation style
    #[command(alias = "animation")]
    Anim {
        #[arg(value_enum)]
        value: AnimChoice,
    },
}

#[derive(Subcommand, Debug)]
pub enum PinCommands {
    /// Set a new PIN; later invocations start locked
    Set {
        #[arg(value_name = "PIN")]
        code: String,
    },
}
