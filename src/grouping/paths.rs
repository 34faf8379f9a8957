//! Directory grouping: turning relative paths into a compressed folder tree.

use indexmap::IndexMap;
use smol_str::SmolStr;

/// An intermediate folder node produced by [`group_paths`].
///
/// `name` is a single path segment, or a `/`-joined chain of segments after
/// single-child folders were merged. `files` holds the input path strings
/// of the files directly inside this folder, in input order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GroupNode {
    pub name: SmolStr,
    pub children: IndexMap<SmolStr, GroupNode>,
    pub files: Vec<String>,
}

impl GroupNode {
    fn named(name: &str) -> Self {
        Self {
            name: SmolStr::new(name),
            ..Self::default()
        }
    }

    /// Whether this folder would be merged into its only child.
    #[inline]
    pub fn is_pass_through(&self) -> bool {
        self.files.is_empty() && self.children.len() == 1
    }

    /// All file paths in this subtree, folders first in child order.
    pub fn leaf_files(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_files(&mut out);
        out
    }

    fn collect_files<'a>(&'a self, out: &mut Vec<&'a str>) {
        for child in self.children.values() {
            child.collect_files(out);
        }
        out.extend(self.files.iter().map(String::as_str));
    }

    /// The first file found in this subtree, preferring direct files.
    pub fn first_file(&self) -> Option<&str> {
        self.files
            .first()
            .map(String::as_str)
            .or_else(|| self.children.values().find_map(GroupNode::first_file))
    }
}

/// Group slash-separated relative paths into a compressed folder tree.
///
/// Every path's last segment is a file, recorded (as the full input path) in
/// the folder for its parent segments. Folders that hold no files and exactly
/// one subfolder are then merged with that subfolder, so
/// `["a/b/c/f1.ts", "a/b/c/d/f2.ts"]` yields a root with a single folder
/// `a/b/c` containing `f1.ts` and a subfolder `d`.
///
/// The returned root is never merged and always has an empty name.
pub fn group_paths<I, S>(paths: I) -> GroupNode
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut root = GroupNode::default();

    for path in paths {
        let path = path.as_ref();
        let mut segments: Vec<&str> = path.split('/').collect();
        segments.pop(); // file name

        let mut current = &mut root;
        for segment in segments {
            current = current
                .children
                .entry(SmolStr::new(segment))
                .or_insert_with(|| GroupNode::named(segment));
        }
        current.files.push(path.to_string());
    }

    compress_children(root)
}

/// Rebuild `node` with every child compressed, bottom-up.
fn compress_children(node: GroupNode) -> GroupNode {
    let children = node
        .children
        .into_iter()
        .map(|(segment, child)| (segment, merge_pass_through(compress_children(child))))
        .collect();

    GroupNode {
        name: node.name,
        children,
        files: node.files,
    }
}

/// Merge `node` with its only subfolder until it holds files or branches.
fn merge_pass_through(mut node: GroupNode) -> GroupNode {
    while node.is_pass_through() {
        let Some((_, only)) = node.children.pop() else {
            break;
        };
        node = GroupNode {
            name: SmolStr::from(format!("{}/{}", node.name, only.name)),
            children: only.children,
            files: only.files,
        };
    }
    node
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_fixpoint(node: &GroupNode) {
        for child in node.children.values() {
            assert!(
                !child.is_pass_through(),
                "folder {} should have been merged",
                child.name
            );
            assert_fixpoint(child);
        }
    }

    #[test]
    fn test_group_paths_compresses_chain() {
        let root = group_paths(["a/b/c/f1.ts", "a/b/c/d/f2.ts"]);

        assert_eq!(root.name, "");
        assert!(root.files.is_empty());
        assert_eq!(root.children.len(), 1);

        let abc = &root.children["a"];
        assert_eq!(abc.name, "a/b/c");
        assert_eq!(abc.files, vec!["a/b/c/f1.ts".to_string()]);
        assert_eq!(abc.children.len(), 1);

        let d = &abc.children["d"];
        assert_eq!(d.name, "d");
        assert_eq!(d.files, vec!["a/b/c/d/f2.ts".to_string()]);
        assert!(d.children.is_empty());
    }

    #[test]
    fn test_group_paths_branching_stops_compression() {
        let root = group_paths([
            "Folder1/Folder2/Folder4/Folder6/File1.txt",
            "Folder1/Folder2/Folder4/Folder7/File2.txt",
        ]);

        let top = &root.children["Folder1"];
        assert_eq!(top.name, "Folder1/Folder2/Folder4");
        assert_eq!(top.children["Folder6"].name, "Folder6");
        assert_eq!(top.children["Folder7"].name, "Folder7");
        assert_fixpoint(&root);
    }

    #[test]
    fn test_group_paths_root_files() {
        let root = group_paths(["README.md", "src/lib.rs"]);

        assert_eq!(root.files, vec!["README.md".to_string()]);
        assert_eq!(root.children["src"].name, "src");
    }

    #[test]
    fn test_group_paths_root_is_never_merged() {
        let root = group_paths(["only/one/file.rs"]);

        assert_eq!(root.name, "");
        assert_eq!(root.children["only"].name, "only/one");
    }

    #[test]
    fn test_leaf_files_preserved() {
        let input = ["x/y/z.rs", "x/y/w/v.rs", "x/q.rs", "top.rs", "m/n/o/p.rs"];
        let root = group_paths(input);

        let mut leaves = root.leaf_files();
        leaves.sort_unstable();
        let mut expected = input.to_vec();
        expected.sort_unstable();

        assert_eq!(leaves, expected);
        assert_fixpoint(&root);
    }

    #[test]
    fn test_first_file_prefers_direct_files() {
        let root = group_paths(["a/b/deep.rs", "a/shallow.rs"]);
        assert_eq!(root.children["a"].first_file(), Some("a/shallow.rs"));
    }

    #[test]
    fn test_empty_input() {
        let root = group_paths(Vec::<String>::new());
        assert!(root.children.is_empty());
        assert!(root.files.is_empty());
    }
}
