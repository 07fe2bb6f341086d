use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;

use unicode_normalization::UnicodeNormalization;

/// Alias -> canonical skill label.
static ALIAS_TO_CANONICAL: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    let aliases: &[(&str, &[&str])] = &[
        (
            "javascript",
            &["js", "javascript", "java script", "ecmascript", "es6"],
        ),
        ("typescript", &["ts", "typescript", "type script"]),
        ("nodejs", &["node.js", "node js", "nodejs", "node"]),
        ("react", &["reactjs", "react.js", "react js", "react"]),
        ("react-native", &["react native", "react-native", "rn"]),
        ("vue", &["vue.js", "vuejs", "vue js", "vue"]),
        ("angular", &["angularjs", "angular.js", "angular"]),
        ("nextjs", &["next.js", "nextjs", "next js"]),
        ("express", &["express.js", "expressjs", "express js", "express"]),
        ("graphql", &["graphql", "graph ql", "gql"]),
        ("rest", &["rest", "restful", "rest api", "rest apis"]),
        ("spring", &["spring boot", "springboot", "spring framework", "spring"]),
        ("django", &["django rest framework", "drf", "django"]),
        ("dotnet", &[".net", "dotnet", "dot net", ".net core", "asp.net"]),
        ("csharp", &["c#", "csharp", "c sharp"]),
        ("cpp", &["c++", "cpp", "cplusplus"]),
        ("golang", &["go", "golang"]),
        ("python", &["python3", "python 3", "py", "python"]),
        ("java", &["java", "java8", "java11", "java17"]),
        ("kotlin", &["kotlin", "kt"]),
        ("rust", &["rust", "rustlang", "rust lang"]),
        ("postgresql", &["postgres", "pg", "postgresql", "postgre sql", "psql"]),
        ("mysql", &["my sql", "mysql", "mariadb"]),
        ("mongodb", &["mongo", "mongo db", "mongodb"]),
        ("sql", &["sql", "t-sql", "tsql", "pl/sql", "plsql"]),
        ("redis", &["redis", "redis cache"]),
        ("elasticsearch", &["elastic search", "elasticsearch", "elastic"]),
        ("dynamodb", &["dynamo", "dynamodb", "dynamo db"]),
        (
            "aws",
            &["amazon web services", "amazon aws", "aws cloud", "aws"],
        ),
        ("gcp", &["google cloud platform", "google cloud", "gcp"]),
        ("azure", &["microsoft azure", "ms azure", "azure cloud", "azure"]),
        ("kubernetes", &["k8s", "kubernetes", "kube"]),
        ("docker", &["docker", "containers", "containerization"]),
        ("terraform", &["terraform", "tf", "hcl"]),
        ("cicd", &["ci/cd", "cicd", "ci cd", "continuous integration"]),
        ("salesforce", &["salesforce", "sfdc", "salesforce.com"]),
        ("sap", &["sap", "sap erp", "sap s/4", "s/4hana"]),
        ("powerbi", &["power bi", "powerbi", "power-bi"]),
        ("ml", &["ml", "machine learning"]),
        ("ai", &["ai", "artificial intelligence"]),
    ];

    aliases
        .iter()
        .flat_map(|(canonical, variants)| variants.iter().map(move |alias| (*alias, *canonical)))
        .collect()
});

/// Filler words that carry no skill signal.
const STOPWORDS: &[&str] = &[
    "and", "or", "with", "the", "of", "for", "in", "on", "a", "an", "to", "yrs", "years",
    "year", "experience", "preferred", "plus", "using",
];

/// NFKC-fold, lowercase, trim and collapse internal whitespace.
fn collapse(label: &str) -> String {
    let folded: String = label.nfkc().collect();
    folded
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Canonical form of a whole label, falling back to the collapsed label.
pub fn canonical_label(label: &str) -> String {
    let collapsed = collapse(label);
    ALIAS_TO_CANONICAL
        .get(collapsed.as_str())
        .map(|canonical| canonical.to_string())
        .unwrap_or(collapsed)
}

/// Canonical tokens of a label. Punctuation that belongs to skill names (`+`, `#`, `.`, `/`)
/// is kept inside a token; everything else separates tokens.
pub fn canonical_tokens(label: &str) -> BTreeSet<String> {
    let whole = canonical_label(label);
    if whole != collapse(label) {
        return BTreeSet::from([whole]);
    }

    whole
        .split(|ch: char| !(ch.is_alphanumeric() || matches!(ch, '+' | '#' | '.' | '/')))
        .flat_map(|chunk| {
            let chunk = chunk.trim_matches('.');
            if ALIAS_TO_CANONICAL.contains_key(chunk) {
                vec![chunk.to_string()]
            } else {
                chunk.split('/').map(str::to_string).collect()
            }
        })
        .map(|token| token.trim_matches(|ch: char| ch == '.' || ch == '/').to_string())
        .filter(|token| token.chars().any(char::is_alphabetic))
        .filter(|token| !STOPWORDS.contains(&token.as_str()))
        .map(|token| {
            ALIAS_TO_CANONICAL
                .get(token.as_str())
                .map(|canonical| canonical.to_string())
                .unwrap_or(token)
        })
        .collect()
}
