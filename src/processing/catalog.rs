//! Static skill -> achievement sentence catalog

use anyhow::Context;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub skill: String,
    pub template: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchKind {
    Exact,
    Partial,
}

#[derive(Debug, Clone, Copy)]
pub struct CatalogMatch<'a> {
    pub entry: &'a CatalogEntry,
    pub kind: MatchKind,
}

/// Ordered, read-only mapping from canonical skill names to template
/// sentences. Iteration order decides which entry wins a partial match.
#[derive(Debug, Clone, Default)]
pub struct SkillCatalog {
    entries: Vec<CatalogEntry>,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    entries: Vec<CatalogEntry>,
}

static BUILTIN: Lazy<SkillCatalog> = Lazy::new(|| SkillCatalog::from_pairs(BUILTIN_TEMPLATES));

const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    ("AWS Organizations", "Implemented AWS Organizations and Service Control Policies (SCPs) to enforce security governance across multi-account AWS environments"),
    ("AWS Config", "Configured AWS Config rules for automated compliance monitoring and infrastructure validation"),
    ("AWS Security Hub", "Deployed AWS Security Hub for centralized threat detection and compliance status aggregation"),
    ("AWS IAM", "Designed fine-grained IAM policies enforcing least-privilege access principles across AWS resources"),
    ("AWS cost optimization", "Optimized AWS infrastructure costs through reserved instances, spot instances, and right-sizing analysis"),
    ("IQ scripts", "Developed and maintained IQ scripts for automated security validation and policy compliance verification"),
    ("Service Control Policies", "Implemented Service Control Policies (SCPs) for multi-account governance and security enforcement"),
    ("SCPs", "Configured SCPs for centralized policy management and compliance enforcement across organizations"),
    ("Terraform", "Managed infrastructure automation and version control using Terraform for Infrastructure-as-Code deployment"),
    ("CloudFormation", "Designed AWS CloudFormation templates for Infrastructure-as-Code automation and consistent environment provisioning"),
    ("Pulumi", "Implemented Pulumi for programmatic infrastructure definition and multi-cloud resource provisioning"),
    ("CDK", "Utilized AWS CDK for infrastructure definition using familiar programming languages"),
    ("Ansible", "Automated configuration management and application rollout with Ansible playbooks across hybrid server fleets"),
    ("Python", "Developed Python automation scripts for infrastructure management and CI/CD pipeline orchestration"),
    ("Bash", "Wrote Bash scripts for system automation and DevOps workflow optimization"),
    ("Jenkins", "Implemented Jenkins CI/CD pipelines for automated build, test, and production deployment"),
    ("ArgoCD", "Deployed and maintained ArgoCD for GitOps-based continuous deployment and infrastructure-as-code synchronization"),
    ("GitHub Actions", "Configured GitHub Actions workflows for automated testing, building, and deployment"),
    ("GitLab CI", "Implemented GitLab CI/CD pipelines for automated software delivery across multiple environments"),
    ("Kubernetes", "Architected and managed Kubernetes clusters for container orchestration and microservices deployment"),
    ("Docker", "Containerized applications using Docker for consistent multi-environment deployment and reduced deployment complexity"),
    ("Helm", "Utilized Helm for Kubernetes package management and templated application deployments"),
    ("ECS Fargate", "Deployed containerized services on Amazon ECS Fargate, removing server management overhead and scaling workloads on demand"),
    ("Lambda", "Built event-driven serverless workloads on AWS Lambda, reducing operational overhead and infrastructure cost"),
    ("Apache Kafka", "Operated Apache Kafka clusters for high-throughput event streaming between distributed services"),
    ("Prometheus", "Instrumented services with Prometheus metrics and alerting rules to shorten incident detection time"),
    ("Grafana", "Built Grafana dashboards that gave engineering teams real-time visibility into service health and capacity"),
    ("Istio", "Implemented Istio service mesh for traffic management, mutual TLS, and fine-grained observability between microservices"),
    ("DevSecOps", "Integrated security practices into DevOps workflows with automated scanning and compliance verification"),
    ("CI/CD pipelines", "Designed comprehensive CI/CD pipelines for automated testing and production deployment"),
    ("Microservices", "Architected and deployed microservices-based applications for improved scalability and independent service management"),
];

impl SkillCatalog {
    /// The catalog compiled into the binary, built once per process
    pub fn builtin() -> &'static SkillCatalog {
        &BUILTIN
    }

    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self {
            entries: pairs
                .iter()
                .map(|(skill, template)| CatalogEntry {
                    skill: skill.to_string(),
                    template: template.to_string(),
                })
                .collect(),
        }
    }

    /// Builtin entries followed by `extra`. An extra entry whose skill matches
    /// an existing key (ignoring case) replaces that entry's template in place.
    pub fn with_extensions(extra: Vec<CatalogEntry>) -> Self {
        let mut catalog = Self::builtin().clone();
        for entry in extra {
            match catalog
                .entries
                .iter_mut()
                .find(|e| e.skill.eq_ignore_ascii_case(&entry.skill))
            {
                Some(existing) => existing.template = entry.template,
                None => catalog.entries.push(entry),
            }
        }
        catalog
    }

    /// Read `[[entries]]` tables (`skill`, `template`) from a TOML file
    pub fn load_entries(path: &Path) -> anyhow::Result<Vec<CatalogEntry>> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read catalog file {}", path.display()))?;
        let file: CatalogFile = toml::from_str(&content)
            .with_context(|| format!("failed to parse catalog file {}", path.display()))?;
        Ok(file.entries)
    }

    /// Case-insensitive exact match
    pub fn exact(&self, skill: &str) -> Option<&CatalogEntry> {
        let skill = skill.to_lowercase();
        self.entries.iter().find(|e| e.skill.to_lowercase() == skill)
    }

    /// First entry (in catalog order) whose key contains the skill or is
    /// contained in it, ignoring case
    pub fn partial(&self, skill: &str) -> Option<&CatalogEntry> {
        let skill = skill.to_lowercase();
        self.entries.iter().find(|e| {
            let key = e.skill.to_lowercase();
            key.contains(&skill) || skill.contains(&key)
        })
    }

    /// Exact match first, then partial
    pub fn lookup(&self, skill: &str) -> Option<CatalogMatch<'_>> {
        if let Some(entry) = self.exact(skill) {
            return Some(CatalogMatch {
                entry,
                kind: MatchKind::Exact,
            });
        }

        self.partial(skill).map(|entry| CatalogMatch {
            entry,
            kind: MatchKind::Partial,
        })
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_catalog() {
        let catalog = SkillCatalog::builtin();
        assert!(catalog.len() >= 24);
        assert!(catalog.exact("terraform").is_some());
    }

    #[test]
    fn test_exact_beats_partial() {
        let catalog = SkillCatalog::from_pairs(&[
            ("Terraform Cloud", "cloud template"),
            ("Terraform", "plain template"),
        ]);

        let found = catalog.lookup("terraform").unwrap();
        assert_eq!(found.kind, MatchKind::Exact);
        assert_eq!(found.entry.template, "plain template");
    }

    #[test]
    fn test_partial_uses_catalog_order() {
        let catalog = SkillCatalog::builtin();

        // "kubernetes clusters" contains the "Kubernetes" key
        let found = catalog.lookup("Kubernetes clusters").unwrap();
        assert_eq!(found.kind, MatchKind::Partial);
        assert_eq!(found.entry.skill, "Kubernetes");

        // "GitLab" is contained in the "GitLab CI" key
        let found = catalog.lookup("GitLab").unwrap();
        assert_eq!(found.entry.skill, "GitLab CI");
    }

    #[test]
    fn test_no_match() {
        let catalog = SkillCatalog::builtin();
        assert!(catalog.lookup("Quantum Flux Capacitor Tuning").is_none());
    }

    #[test]
    fn test_extensions_override_and_append() {
        let catalog = SkillCatalog::with_extensions(vec![
            CatalogEntry {
                skill: "terraform".to_string(),
                template: "Custom Terraform sentence".to_string(),
            },
            CatalogEntry {
                skill: "Backstage".to_string(),
                template: "Rolled out Backstage as the internal developer portal".to_string(),
            },
        ]);

        assert_eq!(catalog.exact("Terraform").unwrap().template, "Custom Terraform sentence");
        assert_eq!(catalog.len(), SkillCatalog::builtin().len() + 1);
        assert_eq!(catalog.entries().last().unwrap().skill, "Backstage");
        // the process-wide catalog is untouched
        assert_ne!(
            SkillCatalog::builtin().exact("Terraform").unwrap().template,
            "Custom Terraform sentence"
        );
    }

    #[test]
    fn test_load_entries_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[[entries]]\nskill = \"Loki\"\ntemplate = \"Centralized log aggregation with Grafana Loki\""
        )
        .unwrap();

        let entries = SkillCatalog::load_entries(file.path()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].skill, "Loki");
    }

    #[test]
    fn test_load_entries_reports_path() {
        let err = SkillCatalog::load_entries(Path::new("/nonexistent/catalog.toml")).unwrap_err();
        assert!(format!("{:#}", err).contains("/nonexistent/catalog.toml"));
    }
}
