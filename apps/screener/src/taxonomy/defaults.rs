//! Built-in skill table used when no taxonomy file is configured.
//!
//! Order matters: when two skills claim the same synonym the earlier entry wins.

pub(super) const DEFAULT_SKILLS: &[(&str, &[&str])] = &[
    // Languages
    (
        "java",
        &["java", "j2ee", "jdk", "jre", "java 8", "java 11", "java 17"],
    ),
    ("python", &["python", "python3", "py"]),
    (
        "javascript",
        &["javascript", "js", "ecmascript", "es6", "es2015"],
    ),
    ("typescript", &["typescript", "ts"]),
    ("csharp", &["c#", "csharp", ".net", "dotnet"]),
    ("cpp", &["c++", "cpp"]),
    ("go", &["go", "golang"]),
    ("rust", &["rust"]),
    ("ruby", &["ruby", "rails"]),
    ("php", &["php"]),
    ("kotlin", &["kotlin"]),
    ("scala", &["scala"]),
    ("swift", &["swift"]),
    ("sql", &["sql", "t-sql", "pl/sql", "plsql"]),
    // Frameworks
    (
        "spring",
        &[
            "spring",
            "spring boot",
            "spring mvc",
            "spring framework",
            "spring cloud",
        ],
    ),
    ("hibernate", &["hibernate", "jpa"]),
    ("django", &["django"]),
    ("flask", &["flask"]),
    ("react", &["react", "reactjs", "react.js"]),
    ("angular", &["angular", "angularjs", "angular.js"]),
    ("vue", &["vue", "vuejs", "vue.js"]),
    ("nodejs", &["node", "nodejs", "node.js"]),
    ("express", &["express", "expressjs", "express.js"]),
    ("aspnet", &["asp.net", "aspnet"]),
    ("struts", &["struts"]),
    ("jsf", &["jsf", "java server faces"]),
    // Databases
    ("mysql", &["mysql"]),
    ("postgresql", &["postgresql", "postgres"]),
    ("mongodb", &["mongodb", "mongo"]),
    ("oracle", &["oracle", "oracle db", "oracle database"]),
    ("sqlserver", &["sql server", "mssql", "ms sql"]),
    ("redis", &["redis"]),
    ("cassandra", &["cassandra"]),
    ("dynamodb", &["dynamodb"]),
    ("db2", &["db2"]),
    // Cloud
    (
        "aws",
        &[
            "aws",
            "amazon web services",
            "ec2",
            "s3",
            "lambda",
            "cloudformation",
        ],
    ),
    ("azure", &["azure", "microsoft azure"]),
    ("gcp", &["gcp", "google cloud", "google cloud platform"]),
    // DevOps
    ("docker", &["docker"]),
    ("kubernetes", &["kubernetes", "k8s"]),
    ("jenkins", &["jenkins"]),
    ("git", &["git", "github", "gitlab", "bitbucket"]),
    (
        "cicd",
        &[
            "ci/cd",
            "cicd",
            "continuous integration",
            "continuous deployment",
        ],
    ),
    ("maven", &["maven"]),
    ("gradle", &["gradle"]),
    ("ansible", &["ansible"]),
    ("terraform", &["terraform"]),
    // Web
    ("html", &["html", "html5"]),
    ("css", &["css", "css3", "sass", "scss"]),
    ("rest", &["rest", "restful", "rest api"]),
    ("soap", &["soap"]),
    ("microservices", &["microservices", "microservice"]),
    ("graphql", &["graphql"]),
    ("json", &["json"]),
    ("xml", &["xml"]),
    // Methodologies
    ("agile", &["agile"]),
    ("scrum", &["scrum"]),
    ("kanban", &["kanban"]),
    ("devops", &["devops"]),
    ("tdd", &["tdd", "test driven development"]),
    ("bdd", &["bdd", "behavior driven development"]),
];
