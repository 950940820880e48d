//! Session and authentication state.
//!
//! `SessionManager` owns the current user and token. It is created explicitly,
//! initialized with `restore_session` and torn down with `logout`; consumers get
//! it handed to them rather than reaching for global state.
//!
//! ```text
//! Unauthenticated --sign_in/sign_up--> Authenticating --ok--> Authenticated
//!                                      Authenticating --err-> Unauthenticated
//! Authenticated --logout--> Unauthenticated
//! ```
//! There is no refresh state: an expired token shows up as a 401 from the HTTP layer.

mod manager;

pub use manager::{AuthState, SessionManager, SignUpRequest};
