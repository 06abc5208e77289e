// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

/// Who is issuing commands. Identities come already verified by whatever
/// authenticated the user, nothing is checked here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    user_id: Option<String>,
    email: Option<String>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn login(user_id: &str, email: Option<&str>) -> Self {
        Self {
            user_id: Some(user_id.to_owned()),
            email: email.map(String::from),
        }
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn is_admin(&self, admins: &[String]) -> bool {
        match &self.email {
            Some(email) => admins.iter().any(|admin| admin == email),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admins_by_email() {
        let admins = vec!["angela@example.com".to_string()];

        assert!(Session::login("u1", Some("angela@example.com")).is_admin(&admins));
        assert!(!Session::login("u2", Some("bob@example.com")).is_admin(&admins));
        assert!(!Session::login("u1", None).is_admin(&admins));
        assert!(!Session::anonymous().is_admin(&admins));
        assert_eq!(Session::anonymous().user_id(), None);
    }
}
