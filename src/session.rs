use crate::storage::KeyValueStore;

pub const ID_TOKEN_KEY: &str = "idToken";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// Bearer credentials kept in a durable store.
#[derive(Debug)]
pub struct Session<S> {
    store: S,
}

impl<S: KeyValueStore> Session<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn id_token(&self) -> Option<String> {
        self.store
            .get(ID_TOKEN_KEY)
            .filter(|token| !token.trim().is_empty())
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.store
            .get(REFRESH_TOKEN_KEY)
            .filter(|token| !token.trim().is_empty())
    }

    pub fn is_authenticated(&self) -> bool {
        self.id_token().is_some()
    }

    pub fn persist(&mut self, id_token: &str, refresh_token: &str) {
        self.store.set(ID_TOKEN_KEY, id_token.to_string());
        self.store.set(REFRESH_TOKEN_KEY, refresh_token.to_string());
    }

    pub fn clear(&mut self) {
        self.store.remove(ID_TOKEN_KEY);
        self.store.remove(REFRESH_TOKEN_KEY);
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}
