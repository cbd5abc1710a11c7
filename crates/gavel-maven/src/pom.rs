//! POM file parsing: dependency declarations, dependency management, and
//! `${property}` interpolation against the POM's own properties and the
//! well-known `project.*` fields.

use std::collections::{BTreeMap, HashSet};

use gavel_core::dependency::TransitiveDependency;
use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::warn;

/// A parsed POM (Project Object Model) file.
#[derive(Debug, Clone, Default)]
pub struct Pom {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    pub packaging: Option<String>,

    pub parent: Option<ParentRef>,
    pub properties: BTreeMap<String, String>,
    pub dependencies: Vec<PomDependency>,
    pub dependency_management: Vec<PomDependency>,
}

/// Reference to a parent POM.
#[derive(Debug, Clone, Default)]
pub struct ParentRef {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

/// A dependency declared in a POM file.
#[derive(Debug, Clone)]
pub struct PomDependency {
    pub group_id: String,
    pub artifact_id: String,
    pub version: Option<String>,
    pub scope: Option<String>,
    pub optional: bool,
    pub type_: Option<String>,
}

impl PomDependency {
    fn empty() -> Self {
        Self {
            group_id: String::new(),
            artifact_id: String::new(),
            version: None,
            scope: None,
            optional: false,
            type_: None,
        }
    }

    fn id(&self) -> String {
        format!("{}:{}", self.group_id, self.artifact_id)
    }
}

impl Pom {
    /// Effective group ID (falls back to parent).
    pub fn effective_group_id(&self) -> Option<&str> {
        self.group_id
            .as_deref()
            .or(self.parent.as_ref().map(|p| p.group_id.as_str()))
    }

    /// Effective version (falls back to parent).
    pub fn effective_version(&self) -> Option<&str> {
        self.version
            .as_deref()
            .or(self.parent.as_ref().map(|p| p.version.as_str()))
    }

    /// Resolve `${property}` references in a string.
    ///
    /// Resolution order: the reflective `project.*` names (falling back to
    /// the parent reference when the field is absent on this model), then
    /// the `<properties>` block. Unresolvable placeholders are left as the
    /// literal text.
    pub fn interpolate(&self, input: &str) -> String {
        let mut result = input.to_string();
        let mut iterations = 0;
        while result.contains("${") && iterations < 20 {
            iterations += 1;
            let mut new = result.clone();
            let mut search_from = 0;
            while let Some(offset) = new[search_from..].find("${") {
                let start = search_from + offset;
                let Some(end) = new[start..].find('}') else {
                    break;
                };
                let key = &new[start + 2..start + end];
                match self.resolve_property(key) {
                    Some(val) => {
                        new = format!("{}{}{}", &new[..start], val, &new[start + end + 1..]);
                        // Nested references in the substitution are picked
                        // up by the next outer iteration.
                        search_from = start + val.len();
                    }
                    // Leave the unresolvable placeholder literal and keep
                    // scanning after it.
                    None => search_from = start + end + 1,
                }
            }
            if new == result {
                break;
            }
            result = new;
        }
        result
    }

    fn resolve_property(&self, key: &str) -> Option<String> {
        match key {
            "project.groupId" | "pom.groupId" => self.effective_group_id().map(|s| s.to_string()),
            "project.artifactId" | "pom.artifactId" => self.artifact_id.clone(),
            "project.version" | "pom.version" => self.effective_version().map(|s| s.to_string()),
            "project.parent.groupId" => self.parent.as_ref().map(|p| p.group_id.clone()),
            "project.parent.version" => self.parent.as_ref().map(|p| p.version.clone()),
            _ => self.properties.get(key).cloned(),
        }
    }

    /// Interpolate all property references in dependencies and dependency
    /// management.
    pub fn resolve_properties(&mut self) {
        let snapshot = self.clone();
        for dep in self
            .dependencies
            .iter_mut()
            .chain(self.dependency_management.iter_mut())
        {
            dep.group_id = snapshot.interpolate(&dep.group_id);
            dep.artifact_id = snapshot.interpolate(&dep.artifact_id);
            if let Some(ref v) = dep.version {
                dep.version = Some(snapshot.interpolate(v));
            }
        }
    }
}

/// Parse a POM XML string into a [`Pom`].
pub fn parse_pom(xml: &str) -> miette::Result<Pom> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut pom = Pom::default();
    let mut path: Vec<String> = Vec::new();
    let mut text_buf = String::new();

    let mut current_dep: Option<PomDependency> = None;
    let mut current_parent: Option<ParentRef> = None;
    let mut in_dep_mgmt = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let tag = String::from_utf8_lossy(e.name().as_ref()).to_string();
                path.push(tag);
                text_buf.clear();

                match path_context(&path).as_str() {
                    "project>dependencies>dependency" => {
                        in_dep_mgmt = false;
                        current_dep = Some(PomDependency::empty());
                    }
                    "project>dependencyManagement>dependencies>dependency" => {
                        in_dep_mgmt = true;
                        current_dep = Some(PomDependency::empty());
                    }
                    "project>parent" => {
                        current_parent = Some(ParentRef::default());
                    }
                    _ => {}
                }
            }
            Ok(Event::Text(ref e)) => {
                text_buf = e.unescape().unwrap_or_default().to_string();
            }
            Ok(Event::End(_)) => {
                let ctx = path_context(&path);
                let depth = path.len();

                // Properties: <project><properties><key>value</key></properties>
                if depth == 3 && path.get(1).map(|s| s.as_str()) == Some("properties") {
                    let prop_name = path.last().cloned().unwrap_or_default();
                    pom.properties.insert(prop_name, text_buf.clone());
                }

                if let Some(ref mut dep) = current_dep {
                    match path.last().map(|s| s.as_str()) {
                        Some("groupId") if ctx.ends_with(">dependency>groupId") => {
                            dep.group_id = text_buf.clone();
                        }
                        Some("artifactId") if ctx.ends_with(">dependency>artifactId") => {
                            dep.artifact_id = text_buf.clone();
                        }
                        Some("version") if ctx.ends_with(">dependency>version") => {
                            dep.version = Some(text_buf.clone());
                        }
                        Some("scope") if ctx.ends_with(">dependency>scope") => {
                            dep.scope = Some(text_buf.clone());
                        }
                        Some("optional") if ctx.ends_with(">dependency>optional") => {
                            dep.optional = text_buf.trim() == "true";
                        }
                        Some("type") if ctx.ends_with(">dependency>type") => {
                            dep.type_ = Some(text_buf.clone());
                        }
                        _ => {}
                    }

                    if ctx == "project>dependencies>dependency"
                        || ctx == "project>dependencyManagement>dependencies>dependency"
                    {
                        if let Some(dep) = current_dep.take() {
                            if in_dep_mgmt {
                                pom.dependency_management.push(dep);
                            } else {
                                pom.dependencies.push(dep);
                            }
                        }
                    }
                }

                if let Some(ref mut parent) = current_parent {
                    match path.last().map(|s| s.as_str()) {
                        Some("groupId") if ctx == "project>parent>groupId" => {
                            parent.group_id = text_buf.clone();
                        }
                        Some("artifactId") if ctx == "project>parent>artifactId" => {
                            parent.artifact_id = text_buf.clone();
                        }
                        Some("version") if ctx == "project>parent>version" => {
                            parent.version = text_buf.clone();
                        }
                        _ => {}
                    }
                    if ctx == "project>parent" {
                        pom.parent = current_parent.take();
                    }
                }

                // Top-level project fields
                if depth == 2 {
                    match path.last().map(|s| s.as_str()) {
                        Some("groupId") => pom.group_id = Some(text_buf.clone()),
                        Some("artifactId") => pom.artifact_id = Some(text_buf.clone()),
                        Some("version") => pom.version = Some(text_buf.clone()),
                        Some("packaging") => pom.packaging = Some(text_buf.clone()),
                        _ => {}
                    }
                }

                path.pop();
                text_buf.clear();
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(gavel_util::errors::GavelError::Parse {
                    message: format!("Failed to parse POM XML: {e}"),
                }
                .into());
            }
            _ => {}
        }
    }

    Ok(pom)
}

/// Build a context string from the current XML path for matching.
fn path_context(path: &[String]) -> String {
    path.join(">")
}

/// Parse a POM document into the flat list of dependencies it contributes
/// transitively.
///
/// Direct dependencies are taken first, with properties resolved and
/// `test`/`provided` scopes dropped (absent scope means `compile`). Then any
/// `dependencyManagement` entry not already present by `group:artifact` and
/// whose `type` is not `pom` is appended as a managed hint.
///
/// Resolution is best-effort: an unparseable document yields an empty list,
/// never an error.
pub fn extract_dependencies(xml: &str) -> Vec<TransitiveDependency> {
    let mut pom = match parse_pom(xml) {
        Ok(pom) => pom,
        Err(e) => {
            warn!("skipping unparseable POM: {e}");
            return Vec::new();
        }
    };
    pom.resolve_properties();

    let mut out: Vec<TransitiveDependency> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for dep in &pom.dependencies {
        if matches!(dep.scope.as_deref(), Some("test") | Some("provided")) {
            continue;
        }
        seen.insert(dep.id());
        out.push(to_transitive(dep));
    }

    for dep in &pom.dependency_management {
        if dep.type_.as_deref() == Some("pom") {
            continue;
        }
        if matches!(dep.scope.as_deref(), Some("test") | Some("provided")) {
            continue;
        }
        if !seen.insert(dep.id()) {
            continue;
        }
        out.push(to_transitive(dep));
    }

    out
}

fn to_transitive(dep: &PomDependency) -> TransitiveDependency {
    TransitiveDependency {
        group_id: dep.group_id.clone(),
        artifact_id: dep.artifact_id.clone(),
        version: dep.version.clone(),
        scope: dep.scope.clone(),
        optional: dep.optional,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE_POM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0">
    <modelVersion>4.0.0</modelVersion>
    <groupId>org.example</groupId>
    <artifactId>my-lib</artifactId>
    <version>1.0.0</version>
    <packaging>jar</packaging>

    <properties>
        <foo.version>2.3</foo.version>
    </properties>

    <dependencies>
        <dependency>
            <groupId>com.foo</groupId>
            <artifactId>foo-core</artifactId>
            <version>${foo.version}</version>
        </dependency>
        <dependency>
            <groupId>junit</groupId>
            <artifactId>junit</artifactId>
            <version>4.13.2</version>
            <scope>test</scope>
        </dependency>
    </dependencies>
</project>"#;

    #[test]
    fn parse_simple_pom() {
        let pom = parse_pom(SIMPLE_POM).unwrap();
        assert_eq!(pom.group_id.as_deref(), Some("org.example"));
        assert_eq!(pom.artifact_id.as_deref(), Some("my-lib"));
        assert_eq!(pom.version.as_deref(), Some("1.0.0"));
        assert_eq!(pom.dependencies.len(), 2);
        assert_eq!(pom.properties.get("foo.version").unwrap(), "2.3");
    }

    #[test]
    fn property_interpolation() {
        let mut pom = parse_pom(SIMPLE_POM).unwrap();
        pom.resolve_properties();
        assert_eq!(pom.dependencies[0].version.as_deref(), Some("2.3"));
    }

    #[test]
    fn unresolvable_placeholder_stays_literal() {
        let pom = parse_pom(SIMPLE_POM).unwrap();
        assert_eq!(pom.interpolate("${missing.prop}"), "${missing.prop}");
        assert_eq!(pom.interpolate("${foo.version}"), "2.3");
    }

    #[test]
    fn unresolvable_placeholder_does_not_block_later_ones() {
        let pom = parse_pom(SIMPLE_POM).unwrap();
        assert_eq!(pom.interpolate("${missing}-${foo.version}"), "${missing}-2.3");
        assert_eq!(
            pom.interpolate("${foo.version}/${missing}/${foo.version}"),
            "2.3/${missing}/2.3"
        );
    }

    #[test]
    fn project_fields_resolve_with_parent_fallback() {
        let xml = r#"<?xml version="1.0"?>
<project>
    <parent>
        <groupId>org.example</groupId>
        <artifactId>parent-pom</artifactId>
        <version>2.0.0</version>
    </parent>
    <artifactId>child</artifactId>
    <dependencies>
        <dependency>
            <groupId>${project.groupId}</groupId>
            <artifactId>sibling</artifactId>
            <version>${project.version}</version>
        </dependency>
    </dependencies>
</project>"#;
        let mut pom = parse_pom(xml).unwrap();
        pom.resolve_properties();
        assert_eq!(pom.dependencies[0].group_id, "org.example");
        assert_eq!(pom.dependencies[0].version.as_deref(), Some("2.0.0"));
    }

    #[test]
    fn scope_filtering() {
        let xml = r#"<?xml version="1.0"?>
<project>
    <groupId>g</groupId><artifactId>a</artifactId><version>1</version>
    <dependencies>
        <dependency><groupId>g1</groupId><artifactId>a1</artifactId><version>1</version><scope>test</scope></dependency>
        <dependency><groupId>g2</groupId><artifactId>a2</artifactId><version>1</version><scope>provided</scope></dependency>
        <dependency><groupId>g3</groupId><artifactId>a3</artifactId><version>1</version><scope>compile</scope></dependency>
        <dependency><groupId>g4</groupId><artifactId>a4</artifactId><version>1</version><scope>runtime</scope></dependency>
        <dependency><groupId>g5</groupId><artifactId>a5</artifactId><version>1</version></dependency>
    </dependencies>
</project>"#;
        let deps = extract_dependencies(xml);
        let ids: Vec<String> = deps.iter().map(|d| d.id()).collect();
        assert_eq!(ids, vec!["g3:a3", "g4:a4", "g5:a5"]);
        assert_eq!(deps[2].scope, None);
    }

    #[test]
    fn dependency_management_merge() {
        let xml = r#"<?xml version="1.0"?>
<project>
    <groupId>g</groupId><artifactId>a</artifactId><version>1</version>
    <dependencies>
        <dependency><groupId>com.x</groupId><artifactId>direct</artifactId><version>1.0</version></dependency>
    </dependencies>
    <dependencyManagement>
        <dependencies>
            <dependency><groupId>com.x</groupId><artifactId>direct</artifactId><version>9.9</version></dependency>
            <dependency><groupId>com.y</groupId><artifactId>managed</artifactId><version>2.0</version></dependency>
            <dependency><groupId>com.z</groupId><artifactId>bom</artifactId><version>3.0</version><type>pom</type><scope>import</scope></dependency>
        </dependencies>
    </dependencyManagement>
</project>"#;
        let deps = extract_dependencies(xml);
        let ids: Vec<String> = deps.iter().map(|d| d.full_id()).collect();
        // The direct dep wins over its managed duplicate; the BOM import is skipped.
        assert_eq!(ids, vec!["com.x:direct:1.0", "com.y:managed:2.0"]);
    }

    #[test]
    fn optional_flag_recorded() {
        let xml = r#"<?xml version="1.0"?>
<project>
    <groupId>g</groupId><artifactId>a</artifactId><version>1</version>
    <dependencies>
        <dependency><groupId>com.x</groupId><artifactId>opt</artifactId><version>1.0</version><optional>true</optional></dependency>
    </dependencies>
</project>"#;
        let deps = extract_dependencies(xml);
        assert!(deps[0].optional);
    }

    #[test]
    fn managed_version_absent_is_none() {
        let xml = r#"<?xml version="1.0"?>
<project>
    <groupId>g</groupId><artifactId>a</artifactId><version>1</version>
    <dependencies>
        <dependency><groupId>com.x</groupId><artifactId>lib</artifactId></dependency>
    </dependencies>
</project>"#;
        let deps = extract_dependencies(xml);
        assert_eq!(deps[0].version, None);
        assert_eq!(deps[0].full_id(), "com.x:lib");
    }

    #[test]
    fn malformed_pom_yields_empty_list() {
        assert!(extract_dependencies("<project><dependencies></oops></project>").is_empty());
        assert!(extract_dependencies("not xml at all <<<").is_empty());
    }
}
