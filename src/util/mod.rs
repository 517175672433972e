mod checker;
mod gogdb;
mod http;
mod scanner;
mod sys;
mod updates;

pub use checker::{
    CheckEvent, CheckOptions, CheckStats, ScanEvent, check_game, spawn_check, spawn_scan,
};

pub use gogdb::GogDbClient;

pub use http::CurlFetch;

pub use scanner::{find_gog_galaxy, scan_games, scan_roots};

pub use sys::{launch_detached, msg, open_folder, pick_folder, timestamped, yesno};

pub use updates::{RELEASES_URL, check_for_checker_update};
