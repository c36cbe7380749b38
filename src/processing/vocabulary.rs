//! Known technology and methodology names

use once_cell::sync::Lazy;

/// Canonical spellings recognized anywhere in a job description.
pub static VOCABULARY: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        // Cloud platforms and services
        "AWS", "Azure", "GCP", "Google Cloud",
        "ECS", "EKS", "Fargate", "Lambda", "EC2", "S3", "VPC", "ELB", "CloudFormation", "CDK",
        "AWS Organizations", "AWS Config", "AWS Security Hub", "AWS IAM", "IAM",
        "Service Control Policies", "SCPs",
        // Databases
        "Aurora", "PostgreSQL", "MySQL", "DynamoDB", "MongoDB", "RDS", "Cassandra",
        // Containers and orchestration
        "Kubernetes", "Docker", "OpenShift", "Helm", "ArgoCD", "Kustomize",
        "Istio", "Linkerd", "Flux", "Crossplane",
        // CI/CD
        "Jenkins", "GitLab CI/CD", "GitLab CI", "GitHub Actions", "Tekton", "Bamboo", "TeamCity",
        "CircleCI", "CI/CD",
        // Infrastructure as code
        "Terraform", "Pulumi", "Ansible", "Chef", "Puppet", "Packer", "Vault", "Consul",
        // Monitoring and observability
        "Prometheus", "Grafana", "DataDog", "Splunk", "ELK", "Nagios", "Loki", "Tempo",
        "Jaeger", "OpenTelemetry", "CloudWatch", "Application Insights", "New Relic",
        // Languages and scripting
        "Python", "Bash", "Shell", "Groovy", "Go", "Ruby", "Perl", "Java", "Rust",
        // Messaging and streaming
        "Apache Kafka", "Kafka", "Kinesis", "RabbitMQ", "Redis",
        // Web and application servers
        "Nginx", "Apache", "Tomcat", "JBoss", "WebSphere",
        // Source control and collaboration
        "Git", "GitHub", "GitLab", "Bitbucket", "SVN",
        "JIRA", "Confluence", "ServiceNow",
        // Operating systems
        "Linux", "RHEL", "CentOS", "Ubuntu", "Debian",
        // Build tools
        "Maven", "Ant", "Gradle", "npm", "yarn", "Conan",
        // Security tooling
        "SonarQube", "Trivy", "Snyk", "Checkmarx",
        // Practices
        "DevOps", "GitOps", "DevSecOps", "SRE", "Infrastructure as Code",
        // APIs and architecture
        "REST API", "GraphQL", "gRPC", "WebSockets",
        "Microservices", "BFF", "API Gateway",
        // Methodologies
        "SAFe Agile", "Agile", "Scrum", "Kanban",
        // Protocols and identity
        "SSL", "TLS", "mTLS", "OAuth", "SAML",
        // Testing
        "Selenium", "JUnit", "TestNG", "pytest",
        // Data formats
        "YAML", "JSON", "XML", "HCL",
    ]
});

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_vocabulary_has_no_duplicates() {
        let unique: HashSet<&str> = VOCABULARY.iter().copied().collect();
        assert_eq!(unique.len(), VOCABULARY.len());
    }

    #[test]
    fn test_vocabulary_entries_are_trimmed() {
        for term in VOCABULARY.iter() {
            assert_eq!(term.trim(), *term);
            assert!(!term.is_empty());
        }
    }
}
