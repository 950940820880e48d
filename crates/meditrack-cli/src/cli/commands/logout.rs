//! `meditrack logout`

use crate::cli::app::App;

pub fn run_logout(app: &App) {
    app.session.logout();
    println!("Signed out");
}
