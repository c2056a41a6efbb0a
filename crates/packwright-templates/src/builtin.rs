//! Built-in template bodies, embedded at compile time

use crate::vars::ContextField;

/// One embedded file template
pub struct BuiltinFile {
    pub path: &'static str,
    pub body: &'static str,
    pub requires: &'static [ContextField],
}

/// Embedded templates of one component
pub struct BuiltinComponent {
    pub component: &'static str,
    pub files: &'static [BuiltinFile],
}

/// Template rendered to `LICENSE.txt`
pub const LICENSE_TEMPLATE: &str = include_str!("../templates/LICENSE.txt.tera");

/// Template rendered to `VERSION.txt`
pub const VERSION_TEMPLATE: &str = include_str!("../templates/VERSION.txt.tera");

const fn file(path: &'static str, body: &'static str) -> BuiltinFile {
    BuiltinFile {
        path,
        body,
        requires: &[],
    }
}

pub static BUILTIN_TEMPLATES: &[BuiltinComponent] = &[
    BuiltinComponent {
        component: "frontend",
        files: &[
            file("nginx.conf", include_str!("../templates/frontend/nginx.conf.tera")),
            file("config.json", include_str!("../templates/frontend/config.json.tera")),
        ],
    },
    BuiltinComponent {
        component: "backend",
        files: &[
            BuiltinFile {
                path: "application.env",
                body: include_str!("../templates/backend/application.env.tera"),
                requires: &[ContextField::CompanyName, ContextField::LicenseKey],
            },
            file("service.yaml", include_str!("../templates/backend/service.yaml.tera")),
        ],
    },
    BuiltinComponent {
        component: "database",
        files: &[
            file("schema.sql", include_str!("../templates/database/schema.sql.tera")),
            BuiltinFile {
                path: "seed.sql",
                body: include_str!("../templates/database/seed.sql.tera"),
                requires: &[ContextField::CompanyName],
            },
            file("migrate.sh", include_str!("../templates/database/migrate.sh.tera")),
        ],
    },
    BuiltinComponent {
        component: "docker",
        files: &[
            file(
                "docker-compose.yml",
                include_str!("../templates/docker/docker-compose.yml.tera"),
            ),
            file("install.sh", include_str!("../templates/docker/install.sh.tera")),
        ],
    },
    BuiltinComponent {
        component: "monitoring",
        files: &[
            file("prometheus.yml", include_str!("../templates/monitoring/prometheus.yml.tera")),
            file("alerts.yml", include_str!("../templates/monitoring/alerts.yml.tera")),
        ],
    },
    BuiltinComponent {
        component: "security",
        files: &[
            file("tls.conf", include_str!("../templates/security/tls.conf.tera")),
            file("firewall.rules", include_str!("../templates/security/firewall.rules.tera")),
            file("HARDENING.md", include_str!("../templates/security/HARDENING.md.tera")),
        ],
    },
    BuiltinComponent {
        component: "docs",
        files: &[
            file("INSTALL.md", include_str!("../templates/docs/INSTALL.md.tera")),
            file("OPERATIONS.md", include_str!("../templates/docs/OPERATIONS.md.tera")),
        ],
    },
];
