use std::collections::BTreeMap;

use super::ProductEntry;

/// Credentials injected verbatim into product environments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Secrets {
    pub postgres_password: String,
    pub mysql_password: String,
    pub jwt_secret: String,
}

impl Secrets {
    /// Resolve `POSTGRES_PASSWORD`, `MYSQL_PASSWORD` and `JWT_SECRET`
    /// through `lookup`; missing variables become empty strings.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| lookup(name).unwrap_or_default();
        Self {
            postgres_password: get("POSTGRES_PASSWORD"),
            mysql_password: get("MYSQL_PASSWORD"),
            jwt_secret: get("JWT_SECRET"),
        }
    }
}

const POSTGRES_HOST: &str = "garfenter-postgres";
const MYSQL_HOST: &str = "garfenter-mysql";
const DB_USER: &str = "garfenter";

fn postgres_url(password: &str, database: &str) -> String {
    format!("postgresql://{DB_USER}:{password}@{POSTGRES_HOST}:5432/{database}")
}

fn product(key: &str, port: u16, image: &str, env: &[(&str, String)]) -> ProductEntry {
    ProductEntry {
        key: key.to_string(),
        container_name: format!("garfenter-{key}"),
        port,
        image: image.to_string(),
        env: env
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect::<BTreeMap<_, _>>(),
    }
}

/// The products shipped with the host image.
pub fn builtin_entries(secrets: &Secrets) -> Vec<ProductEntry> {
    let pg = secrets.postgres_password.as_str();
    let my = secrets.mysql_password.as_str();
    let jwt = secrets.jwt_secret.clone();
    let user = || DB_USER.to_string();

    vec![
        product(
            "tienda",
            8000,
            "ghcr.io/saleor/saleor:3.19",
            &[
                ("DATABASE_URL", postgres_url(pg, "garfenter_tienda")),
                ("SECRET_KEY", jwt.clone()),
                ("ALLOWED_HOSTS", "*".into()),
                ("DEBUG", "False".into()),
            ],
        ),
        product(
            "mercado",
            8000,
            "spurtcommerce/spurtcommerce:latest",
            &[
                ("TYPEORM_HOST", MYSQL_HOST.into()),
                ("TYPEORM_USERNAME", user()),
                ("TYPEORM_PASSWORD", my.into()),
                ("TYPEORM_DATABASE", "garfenter_mercado".into()),
            ],
        ),
        product(
            "pos",
            80,
            "opensourcepos/opensourcepos:latest",
            &[
                ("DB_HOST", MYSQL_HOST.into()),
                ("DB_NAME", "garfenter_pos".into()),
                ("DB_USER", user()),
                ("DB_PASS", my.into()),
            ],
        ),
        product(
            "contable",
            3000,
            "bigcapital/bigcapital:latest",
            &[
                ("DATABASE_URL", postgres_url(pg, "garfenter_contable")),
                ("JWT_SECRET", jwt.clone()),
            ],
        ),
        product(
            "erp",
            8069,
            "odoo:17",
            &[
                ("HOST", POSTGRES_HOST.into()),
                ("USER", user()),
                ("PASSWORD", pg.into()),
            ],
        ),
        product(
            "clientes",
            3000,
            "twentycrm/twenty:latest",
            &[
                ("PG_DATABASE_URL", postgres_url(pg, "garfenter_clientes")),
                ("ACCESS_TOKEN_SECRET", jwt.clone()),
            ],
        ),
        product(
            "inmuebles",
            3000,
            "condo-app/condo:latest",
            &[
                ("DATABASE_URL", postgres_url(pg, "garfenter_inmuebles")),
                ("JWT_SECRET", jwt),
            ],
        ),
        product(
            "campo",
            80,
            "farmos/farmos:3.x",
            &[
                ("FARMOS_DB_HOST", POSTGRES_HOST.into()),
                ("FARMOS_DB_USER", user()),
                ("FARMOS_DB_PASS", pg.into()),
                ("FARMOS_DB_NAME", "garfenter_campo".into()),
            ],
        ),
        product(
            "banco",
            8443,
            "apache/fineract:latest",
            &[
                (
                    "FINERACT_HIKARI_JDBC_URL",
                    format!("jdbc:mysql://{MYSQL_HOST}:3306/garfenter_banco"),
                ),
                ("FINERACT_HIKARI_USERNAME", user()),
                ("FINERACT_HIKARI_PASSWORD", my.into()),
            ],
        ),
        product(
            "salud",
            80,
            "hmis/hmis:latest",
            &[
                ("DB_HOST", MYSQL_HOST.into()),
                ("DB_DATABASE", "garfenter_salud".into()),
                ("DB_USERNAME", user()),
                ("DB_PASSWORD", my.into()),
            ],
        ),
        product(
            "educacion",
            3000,
            "instructure/canvas-lms:stable",
            &[
                ("POSTGRES_HOST", POSTGRES_HOST.into()),
                ("POSTGRES_USER", user()),
                ("POSTGRES_PASSWORD", pg.into()),
                ("POSTGRES_DB", "garfenter_educacion".into()),
            ],
        ),
    ]
}
