//! Role-based row visibility

use crate::model::{Role, User};

/// Which rows a user may see in account, activity, ticket and team views
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// Rows owned by this TSA
    Owner(String),
    /// Rows whose `tsm` column is this TSM
    Tsm(String),
    /// Rows whose `manager` column is this manager
    Manager(String),
    All,
}

impl Scope {
    pub fn for_user(user: &User) -> Self {
        Self::for_role(user.role, &user.referenceid)
    }

    pub fn for_role(role: Role, referenceid: &str) -> Self {
        match role {
            Role::Tsa => Scope::Owner(referenceid.to_string()),
            Role::Tsm => Scope::Tsm(referenceid.to_string()),
            Role::Manager => Scope::Manager(referenceid.to_string()),
            Role::Admin => Scope::All,
        }
    }

    /// Column and value to filter on, or `None` for unrestricted.
    ///
    /// The column name is a fixed identifier and safe to splice into SQL.
    pub fn filter(&self) -> Option<(&'static str, &str)> {
        match self {
            Scope::Owner(id) => Some(("referenceid", id.as_str())),
            Scope::Tsm(id) => Some(("tsm", id.as_str())),
            Scope::Manager(id) => Some(("manager", id.as_str())),
            Scope::All => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_columns() {
        assert_eq!(
            Scope::for_role(Role::Tsa, "T1").filter(),
            Some(("referenceid", "T1"))
        );
        assert_eq!(Scope::for_role(Role::Tsm, "M1").filter(), Some(("tsm", "M1")));
        assert_eq!(
            Scope::for_role(Role::Manager, "X1").filter(),
            Some(("manager", "X1"))
        );
        assert_eq!(Scope::for_role(Role::Admin, "A1").filter(), None);
    }
}
