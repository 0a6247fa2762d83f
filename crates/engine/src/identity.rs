/// Source of the signed-in user's email for the tracking snippet.
pub trait IdentityProvider {
    fn current_user_email(&self) -> Option<String>;
}

/// No user is signed in.
#[derive(Debug, Clone, Copy, Default)]
pub struct Anonymous;

impl IdentityProvider for Anonymous {
    fn current_user_email(&self) -> Option<String> {
        None
    }
}

/// A fixed signed-in user.
#[derive(Debug, Clone)]
pub struct SignedIn(pub String);

impl IdentityProvider for SignedIn {
    fn current_user_email(&self) -> Option<String> {
        Some(self.0.clone())
    }
}
