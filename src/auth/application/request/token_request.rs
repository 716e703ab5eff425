//! Keystone v3 password authentication payload, scoped to a project.

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct TokenRequest<'a> {
    pub auth: AuthBody<'a>,
}

#[derive(Debug, Serialize)]
pub struct AuthBody<'a> {
    pub identity: Identity<'a>,
    pub scope: Scope<'a>,
}

#[derive(Debug, Serialize)]
pub struct Identity<'a> {
    pub methods: [&'static str; 1],
    pub password: PasswordMethod<'a>,
}

#[derive(Debug, Serialize)]
pub struct PasswordMethod<'a> {
    pub user: User<'a>,
}

#[derive(Debug, Serialize)]
pub struct User<'a> {
    pub name: &'a str,
    pub domain: Named<'a>,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct Scope<'a> {
    pub project: ProjectScope<'a>,
}

#[derive(Debug, Serialize)]
pub struct ProjectScope<'a> {
    pub id: &'a str,
}

#[derive(Debug, Serialize)]
pub struct Named<'a> {
    pub name: &'a str,
}

impl<'a> TokenRequest<'a> {
    pub fn password(
        username: &'a str,
        password: &'a str,
        user_domain: &'a str,
        project_id: &'a str,
    ) -> Self {
        Self {
            auth: AuthBody {
                identity: Identity {
                    methods: ["password"],
                    password: PasswordMethod {
                        user: User {
                            name: username,
                            domain: Named { name: user_domain },
                            password,
                        },
                    },
                },
                scope: Scope {
                    project: ProjectScope { id: project_id },
                },
            },
        }
    }
}
