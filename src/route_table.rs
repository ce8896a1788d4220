use std::collections::{HashMap, HashSet};

use http::Method;

use crate::models::role::Role;

/// Static authorization table mapping (method, normalized path) to the set
/// of roles permitted, plus the exemption sets for each pipeline stage.
///
/// Built once at startup and injected into the stages; never mutated at
/// runtime. Absence of an entry means deny, never allow.
///
/// The three exemption sets are independent: a route can be exempt from one
/// stage and still subject to another, so each stage consults only its own
/// set.
pub struct RouteTable {
    rules: HashMap<(Method, String), HashSet<Role>>,
    hmac_exempt: HashSet<(Method, String)>,
    session_exempt: HashSet<(Method, String)>,
    role_exempt: HashSet<(Method, String)>,
}

impl RouteTable {
    /// Builds the gateway's route table for the school-records API.
    pub fn school_records() -> Self {
        use Role::{Aro, Dro, Guardian, Student};

        let mut table = Self {
            rules: HashMap::new(),
            hmac_exempt: HashSet::new(),
            session_exempt: HashSet::new(),
            role_exempt: HashSet::new(),
        };

        // Public surface: no signature, no session, no role check.
        for (method, path) in [
            (Method::GET, "/API/public-key"),
            (Method::POST, "/API/login"),
            (Method::POST, "/API/logout"),
            (Method::POST, "/API/register"),
        ] {
            table.exempt_all(method, path);
        }

        table.permit(Method::GET, "/API/profile", &[Student, Guardian, Aro, Dro]);
        table.permit(Method::PUT, "/API/profile", &[Student, Guardian, Aro, Dro]);
        table.permit(Method::GET, "/API/students", &[Aro, Dro]);
        table.permit(Method::GET, "/API/guardians", &[Aro]);
        table.permit(Method::GET, "/API/grades", &[Student, Guardian, Aro]);
        table.permit(Method::POST, "/API/grades", &[Aro]);
        table.permit(Method::GET, "/API/disciplinary", &[Student, Guardian, Dro]);
        table.permit(Method::POST, "/API/disciplinary", &[Dro]);
        table.permit(Method::GET, "/API/reports", &[Aro, Dro]);

        table
    }

    fn permit(&mut self, method: Method, path: &str, roles: &[Role]) {
        self.rules
            .insert((method, path.to_string()), roles.iter().copied().collect());
    }

    fn exempt_all(&mut self, method: Method, path: &str) {
        let key = (method, path.to_string());
        self.hmac_exempt.insert(key.clone());
        self.session_exempt.insert(key.clone());
        self.role_exempt.insert(key);
    }

    /// The roles permitted for a route, or `None` when no entry exists
    /// (which callers must treat as deny).
    pub fn roles_for(&self, method: &Method, path: &str) -> Option<&HashSet<Role>> {
        self.rules.get(&(method.clone(), normalize(path)))
    }

    /// Whether the route bypasses the HMAC authentication stage.
    pub fn is_hmac_exempt(&self, method: &Method, path: &str) -> bool {
        self.hmac_exempt.contains(&(method.clone(), normalize(path)))
    }

    /// Whether the route bypasses the session resolution stage.
    pub fn is_session_exempt(&self, method: &Method, path: &str) -> bool {
        self.session_exempt.contains(&(method.clone(), normalize(path)))
    }

    /// Whether the route bypasses the role authorization stage.
    pub fn is_role_exempt(&self, method: &Method, path: &str) -> bool {
        self.role_exempt.contains(&(method.clone(), normalize(path)))
    }
}

/// Trims trailing slashes (except for the root path) before lookup.
fn normalize(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}
