//! Keyword-rule classification of job requirements into skills-table categories

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    CloudServices,
    Containers,
    CicdTools,
    Databases,
    Monitoring,
    Messaging,
    Methodologies,
    OtherSkills,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::CloudServices,
        Category::Containers,
        Category::CicdTools,
        Category::Databases,
        Category::Monitoring,
        Category::Messaging,
        Category::Methodologies,
        Category::OtherSkills,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Category::CloudServices => "cloud_services",
            Category::Containers => "containers",
            Category::CicdTools => "cicd_tools",
            Category::Databases => "databases",
            Category::Monitoring => "monitoring",
            Category::Messaging => "messaging",
            Category::Methodologies => "methodologies",
            Category::OtherSkills => "other_skills",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::CloudServices => "Cloud Services",
            Category::Containers => "Containers",
            Category::CicdTools => "CI/CD Tools",
            Category::Databases => "Databases",
            Category::Monitoring => "Monitoring",
            Category::Messaging => "Messaging",
            Category::Methodologies => "Methodologies",
            Category::OtherSkills => "Other Skills",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Canonical tags found in a job description, grouped by category
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequirementsSummary {
    pub cloud_services: Vec<String>,
    pub containers: Vec<String>,
    pub cicd_tools: Vec<String>,
    pub databases: Vec<String>,
    pub monitoring: Vec<String>,
    pub messaging: Vec<String>,
    pub methodologies: Vec<String>,
    pub other_skills: Vec<String>,
}

impl RequirementsSummary {
    pub fn tags(&self, category: Category) -> &[String] {
        match category {
            Category::CloudServices => &self.cloud_services,
            Category::Containers => &self.containers,
            Category::CicdTools => &self.cicd_tools,
            Category::Databases => &self.databases,
            Category::Monitoring => &self.monitoring,
            Category::Messaging => &self.messaging,
            Category::Methodologies => &self.methodologies,
            Category::OtherSkills => &self.other_skills,
        }
    }

    fn tags_mut(&mut self, category: Category) -> &mut Vec<String> {
        match category {
            Category::CloudServices => &mut self.cloud_services,
            Category::Containers => &mut self.containers,
            Category::CicdTools => &mut self.cicd_tools,
            Category::Databases => &mut self.databases,
            Category::Monitoring => &mut self.monitoring,
            Category::Messaging => &mut self.messaging,
            Category::Methodologies => &mut self.methodologies,
            Category::OtherSkills => &mut self.other_skills,
        }
    }

    pub fn total(&self) -> usize {
        Category::ALL.iter().map(|c| self.tags(*c).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Non-empty categories in fixed order
    pub fn non_empty(&self) -> impl Iterator<Item = (Category, &[String])> {
        Category::ALL
            .into_iter()
            .map(move |c| (c, self.tags(c)))
            .filter(|(_, tags)| !tags.is_empty())
    }
}

/// Fires when any trigger is a lowercase substring of the job text
#[derive(Debug, Clone, Copy)]
pub struct ClassificationRule {
    pub category: Category,
    pub triggers: &'static [&'static str],
    pub tag: &'static str,
}

const fn rule(category: Category, triggers: &'static [&'static str], tag: &'static str) -> ClassificationRule {
    ClassificationRule {
        category,
        triggers,
        tag,
    }
}

/// Substring triggers are deliberately loose: "safe" also fires inside
/// "safety", "ecs" inside "specs".
pub const RULES: &[ClassificationRule] = &[
    rule(Category::CloudServices, &["ecs", "fargate"], "ECS Fargate"),
    rule(Category::CloudServices, &["lambda", "serverless"], "Lambda"),
    rule(Category::CloudServices, &["aurora"], "Aurora PostgreSQL"),
    rule(Category::CloudServices, &["dynamodb"], "DynamoDB"),
    rule(Category::CloudServices, &["kinesis"], "Kinesis"),
    rule(Category::CloudServices, &["cloudfront"], "CloudFront"),
    rule(Category::CloudServices, &["eks"], "EKS"),
    rule(Category::Containers, &["kubernetes", "k8s"], "Kubernetes"),
    rule(Category::Containers, &["docker"], "Docker"),
    rule(Category::Containers, &["helm"], "Helm"),
    rule(Category::Containers, &["argocd"], "ArgoCD"),
    rule(Category::Containers, &["istio"], "Istio"),
    rule(Category::CicdTools, &["jenkins"], "Jenkins"),
    rule(Category::CicdTools, &["github actions"], "GitHub Actions"),
    rule(Category::CicdTools, &["gitlab"], "GitLab CI/CD"),
    rule(Category::CicdTools, &["tekton"], "Tekton"),
    rule(Category::CicdTools, &["circleci"], "CircleCI"),
    rule(Category::Databases, &["postgres"], "PostgreSQL"),
    rule(Category::Databases, &["mysql"], "MySQL"),
    rule(Category::Databases, &["mongodb"], "MongoDB"),
    rule(Category::Databases, &["redis"], "Redis"),
    rule(Category::Messaging, &["kafka"], "Apache Kafka"),
    rule(Category::Messaging, &["rabbitmq"], "RabbitMQ"),
    rule(Category::Messaging, &["sqs"], "SQS"),
    rule(Category::Monitoring, &["prometheus"], "Prometheus"),
    rule(Category::Monitoring, &["grafana"], "Grafana"),
    rule(Category::Monitoring, &["datadog"], "Datadog"),
    rule(Category::Monitoring, &["splunk"], "Splunk"),
    rule(Category::OtherSkills, &["microservices"], "microservices"),
    rule(Category::OtherSkills, &["bff"], "BFF"),
    rule(Category::Methodologies, &["safe"], "SAFe Agile"),
    rule(Category::Methodologies, &["scrum"], "Scrum"),
];

#[derive(Debug, Clone)]
pub struct CategoryClassifier {
    rules: &'static [ClassificationRule],
}

impl Default for CategoryClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl CategoryClassifier {
    pub fn new() -> Self {
        Self { rules: RULES }
    }

    pub fn classify(&self, text: &str) -> RequirementsSummary {
        let lower = text.to_lowercase();
        let mut summary = RequirementsSummary::default();

        for rule in self.rules {
            if rule.triggers.iter().any(|t| lower.contains(t)) {
                let tags = summary.tags_mut(rule.category);
                if !tags.iter().any(|existing| existing == rule.tag) {
                    tags.push(rule.tag.to_string());
                }
            }
        }

        summary
    }

    pub fn rules(&self) -> &[ClassificationRule] {
        self.rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_original_rules() {
        let classifier = CategoryClassifier::new();
        let text = "Migrate services to ECS and Lambda, back them with Aurora and DynamoDB, \
                    stream through Kinesis and Kafka, run K8s with Helm and ArgoCD, \
                    build in Jenkins and GitLab, store data in Postgres, MySQL and MongoDB, \
                    watch it all with Prometheus and Grafana. Microservices and BFF patterns \
                    in a SAFe environment.";

        let summary = classifier.classify(text);

        assert_eq!(summary.cloud_services, vec!["ECS Fargate", "Lambda", "Aurora PostgreSQL", "DynamoDB", "Kinesis"]);
        assert_eq!(summary.containers, vec!["Kubernetes", "Helm", "ArgoCD"]);
        assert_eq!(summary.cicd_tools, vec!["Jenkins", "GitLab CI/CD"]);
        assert_eq!(summary.databases, vec!["PostgreSQL", "MySQL", "MongoDB"]);
        assert_eq!(summary.messaging, vec!["Apache Kafka"]);
        assert_eq!(summary.monitoring, vec!["Prometheus", "Grafana"]);
        assert_eq!(summary.other_skills, vec!["microservices", "BFF"]);
        assert_eq!(summary.methodologies, vec!["SAFe Agile"]);
    }

    #[test]
    fn test_substring_false_positives_are_kept() {
        let classifier = CategoryClassifier::new();
        let summary = classifier.classify("Strong focus on workplace safety and clear specs");

        assert_eq!(summary.methodologies, vec!["SAFe Agile"]);
        assert_eq!(summary.cloud_services, vec!["ECS Fargate"]);
    }

    #[test]
    fn test_classification_is_idempotent() {
        let classifier = CategoryClassifier::new();
        let text = "Kubernetes, Docker, Jenkins, serverless";
        assert_eq!(classifier.classify(text), classifier.classify(text));
    }

    #[test]
    fn test_empty_text() {
        let summary = CategoryClassifier::new().classify("");
        assert!(summary.is_empty());
        assert_eq!(summary.non_empty().count(), 0);
    }

    #[test]
    fn test_category_keys_serialize_snake_case() {
        assert_eq!(serde_json::to_string(&Category::CicdTools).unwrap(), "\"cicd_tools\"");
        for category in Category::ALL {
            assert_eq!(
                serde_json::to_string(&category).unwrap(),
                format!("\"{}\"", category.key())
            );
        }
    }
}
