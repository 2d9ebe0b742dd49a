//! Built-in list of public Maven repositories

use mirrorcheck_errors::Error;
use mirrorcheck_types::RemoteMirror;

/// Public repositories that commonly host artifacts also shipped by a vendor repository
pub const CURATED_MIRRORS: &[&str] = &[
    "https://repo1.maven.org/maven2/",
    "https://repository.apache.org/content/repositories/releases/",
    "https://repository.apache.org/content/groups/public/",
    "https://repository.apache.org/content/repositories/snapshots/",
    "https://oss.sonatype.org/content/groups/public/",
    "https://oss.sonatype.org/content/groups/staging/",
    "https://oss.sonatype.org/content/repositories/snapshots/",
    "https://oss.sonatype.org/content/groups/scala-tools/",
    "https://repository.jboss.org/nexus/content/groups/ea/",
    "https://maven.repository.redhat.com/techpreview/all/",
    "https://maven.repository.redhat.com/earlyaccess/all/",
    "https://repo.eclipse.org/content/groups/releases/",
    "https://build.shibboleth.net/nexus/content/repositories/thirdparty/",
    "https://m2.neo4j.org/content/groups/public/",
    "https://clojars.org/repo/",
    "http://download.java.net/maven/2/",
    "http://download.java.net/maven/glassfish/",
    "http://download.eclipse.org/jgit/maven/",
    "http://download.eclipse.org/rt/eclipselink/maven.repo/",
    "http://maven.ow2.org/maven2/",
    "http://maven.restlet.org/",
    "http://maven.springframework.org/release/",
    "http://maven.springframework.org/milestone/",
    "http://repository.springsource.com/maven/bundles/release/",
    "http://repository.springsource.com/maven/bundles/external/",
    "http://repository.jetbrains.com/all/",
    "http://repository.ops4j.org/maven2/",
    "http://repo.jfrog.org/artifactory/plugins-releases-local/",
    "http://repo.pentaho.org/artifactory/repo/",
    "http://repos.zeroturnaround.com/nexus/content/groups/zt-public/",
    "http://files.couchbase.com/maven2/",
    "http://svn.apache.org/repos/asf/camel/m2-repo/",
    "http://svn.apache.org/repos/asf/servicemix/m2-repo/",
];

/// Parse [`CURATED_MIRRORS`]
///
/// # Errors
///
/// Returns an error only if an entry of the built-in list is malformed.
pub fn default_mirrors() -> Result<Vec<RemoteMirror>, Error> {
    CURATED_MIRRORS
        .iter()
        .map(|url| RemoteMirror::parse(url))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_curated_mirrors_parse_without_duplicates() {
        let mirrors = default_mirrors().unwrap();
        assert_eq!(mirrors.len(), CURATED_MIRRORS.len());

        let unique: HashSet<_> = mirrors.iter().map(RemoteMirror::as_str).collect();
        assert_eq!(unique.len(), mirrors.len());
    }
}
