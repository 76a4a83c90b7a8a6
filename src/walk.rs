//! # Tree Walking
//!
//! Depth-first traversal driven by a [`FileVisitor`].
//!
//! ## Callback order
//!
//! ```text
//! dir/            pre_visit_directory(dir)
//!   file          visit_file(dir/file)            (or visit_file_failed)
//!   sub/          pre_visit_directory(dir/sub)
//!     ...
//!                 post_visit_directory(dir/sub)
//!                 post_visit_directory(dir)
//! ```
//!
//! Siblings come in the order the backend lists them. A node whose attributes
//! cannot be read is reported once through
//! [`visit_file_failed`](FileVisitor::visit_file_failed) and the walk carries
//! on with its siblings. A directory that cannot be listed still gets its
//! [`post_visit_directory`](FileVisitor::post_visit_directory), carrying the
//! listing error.
//!
//! ## Steering
//!
//! | Result | From `pre_visit_directory` | From any other callback |
//! |--------|---------------------------|-------------------------|
//! | `Continue` | descend | keep going |
//! | `SkipSubtree` | skip children and post-visit | keep going |
//! | `SkipSiblings` | skip this directory and its remaining siblings | skip remaining siblings |
//! | `Terminate` | stop | stop |
//!
//! An `Err` returned by a callback aborts the walk with that error.

use std::path::PathBuf;

use tracing::trace;

use crate::{Attributes, DirectoryStream, FsDir, FsError, FsPath, FsRead, VisitResult};

/// Callbacks invoked during [`walk_file_tree`].
///
/// Every method defaults to `Ok(VisitResult::Continue)`, so implementors only
/// override the points they care about.
///
/// # Example
///
/// ```rust
/// use portable_fs::{Attributes, FileVisitor, FsError, FsPath, VisitResult};
///
/// #[derive(Default)]
/// struct TotalSize(u64);
///
/// impl FileVisitor for TotalSize {
///     fn visit_file(&mut self, _: &FsPath, attrs: &Attributes) -> Result<VisitResult, FsError> {
///         self.0 += attrs.size;
///         Ok(VisitResult::Continue)
///     }
/// }
/// ```
pub trait FileVisitor {
    /// Called on entering a directory, before any of its children.
    fn pre_visit_directory(
        &mut self,
        _dir: &FsPath,
        _attrs: &Attributes,
    ) -> Result<VisitResult, FsError> {
        Ok(VisitResult::Continue)
    }

    /// Called after all children of a directory were visited.
    ///
    /// `error` is set when the directory could not be listed.
    fn post_visit_directory(
        &mut self,
        _dir: &FsPath,
        _error: Option<&FsError>,
    ) -> Result<VisitResult, FsError> {
        Ok(VisitResult::Continue)
    }

    /// Called for every non-directory entry, and for directories at the depth limit.
    fn visit_file(&mut self, _file: &FsPath, _attrs: &Attributes) -> Result<VisitResult, FsError> {
        Ok(VisitResult::Continue)
    }

    /// Called instead of the other callbacks when an entry cannot be inspected.
    fn visit_file_failed(
        &mut self,
        _file: &FsPath,
        _error: &FsError,
    ) -> Result<VisitResult, FsError> {
        Ok(VisitResult::Continue)
    }
}

/// One callback point, as seen by a closure visitor.
#[derive(Debug, Clone, Copy)]
pub enum Visit<'a> {
    /// See [`FileVisitor::pre_visit_directory`].
    PreDirectory(&'a FsPath, &'a Attributes),
    /// See [`FileVisitor::post_visit_directory`].
    PostDirectory(&'a FsPath, Option<&'a FsError>),
    /// See [`FileVisitor::visit_file`].
    File(&'a FsPath, &'a Attributes),
    /// See [`FileVisitor::visit_file_failed`].
    FileFailed(&'a FsPath, &'a FsError),
}

impl<'a> Visit<'a> {
    /// The path the event is about.
    pub fn path(&self) -> &'a FsPath {
        match *self {
            Visit::PreDirectory(p, _)
            | Visit::PostDirectory(p, _)
            | Visit::File(p, _)
            | Visit::FileFailed(p, _) => p,
        }
    }
}

/// A [`FileVisitor`] backed by a closure. Build with [`visitor_fn`].
pub struct FnVisitor<F>(F);

/// Adapt a closure over [`Visit`] events into a [`FileVisitor`].
///
/// ```rust
/// use portable_fs::{visitor_fn, Visit, VisitResult};
///
/// let mut files = Vec::new();
/// let _visitor = visitor_fn(|event| {
///     if let Visit::File(path, _) = event {
///         files.push(path.clone());
///     }
///     Ok(VisitResult::Continue)
/// });
/// ```
pub fn visitor_fn<F>(f: F) -> FnVisitor<F>
where
    F: FnMut(Visit<'_>) -> Result<VisitResult, FsError>,
{
    FnVisitor(f)
}

impl<F> FileVisitor for FnVisitor<F>
where
    F: FnMut(Visit<'_>) -> Result<VisitResult, FsError>,
{
    fn pre_visit_directory(
        &mut self,
        dir: &FsPath,
        attrs: &Attributes,
    ) -> Result<VisitResult, FsError> {
        (self.0)(Visit::PreDirectory(dir, attrs))
    }

    fn post_visit_directory(
        &mut self,
        dir: &FsPath,
        error: Option<&FsError>,
    ) -> Result<VisitResult, FsError> {
        (self.0)(Visit::PostDirectory(dir, error))
    }

    fn visit_file(&mut self, file: &FsPath, attrs: &Attributes) -> Result<VisitResult, FsError> {
        (self.0)(Visit::File(file, attrs))
    }

    fn visit_file_failed(&mut self, file: &FsPath, error: &FsError) -> Result<VisitResult, FsError> {
        (self.0)(Visit::FileFailed(file, error))
    }
}

/// Options for [`walk_file_tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkOptions {
    /// Directories at this depth are handed to `visit_file` instead of being
    /// entered. The start path is depth 0.
    pub max_depth: usize,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            max_depth: usize::MAX,
        }
    }
}

/// What the parent loop should do after a child returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    SkipSiblings,
    Terminate,
}

impl From<VisitResult> for Flow {
    fn from(result: VisitResult) -> Self {
        match result {
            VisitResult::Continue | VisitResult::SkipSubtree => Flow::Continue,
            VisitResult::SkipSiblings => Flow::SkipSiblings,
            VisitResult::Terminate => Flow::Terminate,
        }
    }
}

struct Walker<'a, B: ?Sized, V: ?Sized> {
    fs: &'a B,
    visitor: &'a mut V,
    options: WalkOptions,
    /// Canonical forms of the directories currently being walked.
    ancestors: Vec<PathBuf>,
}

impl<B, V> Walker<'_, B, V>
where
    B: FsRead + FsDir + ?Sized,
    V: FileVisitor + ?Sized,
{
    fn walk(&mut self, path: &FsPath, depth: usize) -> Result<Flow, FsError> {
        let attrs = match self.fs.stat(path.as_path()) {
            Ok(attrs) => attrs,
            Err(e) => return self.failed(path, e),
        };

        if !attrs.is_dir() || depth >= self.options.max_depth {
            trace!(path = %path, depth, "visit_file");
            return self.visitor.visit_file(path, &attrs).map(Flow::from);
        }

        let key = match self.fs.canonicalize(path.as_path()) {
            Ok(key) => key,
            Err(e) => return self.failed(path, e),
        };
        if self.ancestors.contains(&key) {
            let cycle = FsError::FileSystemLoop {
                path: path.as_path().to_path_buf(),
            };
            return self.failed(path, cycle);
        }

        trace!(path = %path, depth, "pre_visit_directory");
        match self.visitor.pre_visit_directory(path, &attrs)? {
            VisitResult::Continue => {}
            VisitResult::SkipSubtree => return Ok(Flow::Continue),
            VisitResult::SkipSiblings => return Ok(Flow::SkipSiblings),
            VisitResult::Terminate => return Ok(Flow::Terminate),
        }

        let listing_error = match DirectoryStream::open(self.fs, path, "*") {
            Ok(children) => {
                self.ancestors.push(key);
                let outcome = self.walk_children(children, depth);
                self.ancestors.pop();
                if outcome? == Flow::Terminate {
                    return Ok(Flow::Terminate);
                }
                None
            }
            Err(e) => Some(e),
        };

        trace!(path = %path, depth, failed = listing_error.is_some(), "post_visit_directory");
        self.visitor
            .post_visit_directory(path, listing_error.as_ref())
            .map(Flow::from)
    }

    fn walk_children(&mut self, children: DirectoryStream, depth: usize) -> Result<Flow, FsError> {
        for child in &children {
            match self.walk(child, depth + 1)? {
                Flow::Continue => {}
                Flow::SkipSiblings => break,
                Flow::Terminate => return Ok(Flow::Terminate),
            }
        }
        Ok(Flow::Continue)
    }

    fn failed(&mut self, path: &FsPath, error: FsError) -> Result<Flow, FsError> {
        trace!(path = %path, %error, "visit_file_failed");
        self.visitor.visit_file_failed(path, &error).map(Flow::from)
    }
}

/// Walk the tree rooted at `start`, depth first, calling `visitor` at each node.
///
/// Returns `start` once the walk completes or the visitor terminates it.
///
/// # Errors
///
/// Only errors returned by the visitor itself. Failures on individual nodes
/// are delivered to the visitor instead.
pub fn walk_file_tree<B, V>(
    fs: &B,
    start: &FsPath,
    options: WalkOptions,
    visitor: &mut V,
) -> Result<FsPath, FsError>
where
    B: FsRead + FsDir + ?Sized,
    V: FileVisitor + ?Sized,
{
    let mut walker = Walker {
        fs,
        visitor,
        options,
        ancestors: Vec::new(),
    };
    walker.walk(start, 0)?;
    Ok(start.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Access;
    use std::collections::HashMap;
    use std::ffi::OsString;
    use std::io;
    use std::path::Path;

    enum Node {
        Dir(Vec<&'static str>),
        File,
        /// Stat fails.
        Broken,
        /// Stat succeeds as a directory but listing fails.
        Unlistable,
        /// A directory whose canonical form is another path.
        Alias(&'static str),
    }

    struct MockFs {
        nodes: HashMap<PathBuf, Node>,
    }

    impl MockFs {
        fn new(nodes: Vec<(&'static str, Node)>) -> Self {
            Self {
                nodes: nodes
                    .into_iter()
                    .map(|(p, n)| (PathBuf::from(p), n))
                    .collect(),
            }
        }

        /// A/B/C, A/f1, A/B/f2
        fn sample() -> Self {
            Self::new(vec![
                ("/A", Node::Dir(vec!["f1", "B"])),
                ("/A/f1", Node::File),
                ("/A/B", Node::Dir(vec!["f2", "C"])),
                ("/A/B/f2", Node::File),
                ("/A/B/C", Node::Dir(vec![])),
            ])
        }

        fn missing(path: &Path, operation: &'static str) -> FsError {
            FsError::NotFound {
                path: path.to_path_buf(),
                operation,
            }
        }
    }

    impl FsRead for MockFs {
        fn stat(&self, path: &Path) -> Result<Attributes, FsError> {
            let is_directory = match self.nodes.get(path) {
                Some(Node::File) => false,
                Some(Node::Dir(_) | Node::Unlistable | Node::Alias(_)) => true,
                Some(Node::Broken) => {
                    return Err(FsError::from_io(
                        "stat",
                        path,
                        io::Error::from(io::ErrorKind::PermissionDenied),
                    ));
                }
                None => return Err(Self::missing(path, "stat")),
            };
            Ok(Attributes {
                size: 1,
                is_directory,
                ..Default::default()
            })
        }

        fn exists(&self, path: &Path) -> Result<bool, FsError> {
            Ok(self.nodes.contains_key(path))
        }

        fn canonicalize(&self, path: &Path) -> Result<PathBuf, FsError> {
            match self.nodes.get(path) {
                Some(Node::Alias(target)) => Ok(PathBuf::from(target)),
                Some(_) => Ok(path.to_path_buf()),
                None => Err(Self::missing(path, "canonicalize")),
            }
        }

        fn access(&self, path: &Path) -> Result<Access, FsError> {
            self.stat(path).map(|_| Access::READ_WRITE)
        }
    }

    impl FsDir for MockFs {
        fn list_entries(&self, path: &Path) -> Result<Vec<OsString>, FsError> {
            match self.nodes.get(path) {
                Some(Node::Dir(children)) => Ok(children.iter().map(OsString::from).collect()),
                Some(Node::Unlistable) => Err(FsError::from_io(
                    "list_entries",
                    path,
                    io::Error::from(io::ErrorKind::PermissionDenied),
                )),
                _ => Err(Self::missing(path, "list_entries")),
            }
        }

        fn create_dir(&self, _: &Path) -> Result<(), FsError> {
            Ok(())
        }
    }

    /// Records every callback as `"<kind> <path>"`, answering from a script.
    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
        answers: HashMap<String, VisitResult>,
    }

    impl Recorder {
        fn answering(event: &str, result: VisitResult) -> Self {
            let mut r = Self::default();
            r.answers.insert(event.to_string(), result);
            r
        }

        fn record(&mut self, event: String) -> Result<VisitResult, FsError> {
            let answer = self
                .answers
                .get(&event)
                .copied()
                .unwrap_or(VisitResult::Continue);
            self.events.push(event);
            Ok(answer)
        }
    }

    impl FileVisitor for Recorder {
        fn pre_visit_directory(
            &mut self,
            dir: &FsPath,
            _: &Attributes,
        ) -> Result<VisitResult, FsError> {
            self.record(format!("pre {}", dir.as_path().display()))
        }

        fn post_visit_directory(
            &mut self,
            dir: &FsPath,
            error: Option<&FsError>,
        ) -> Result<VisitResult, FsError> {
            let suffix = if error.is_some() { " !" } else { "" };
            self.record(format!("post {}{}", dir.as_path().display(), suffix))
        }

        fn visit_file(&mut self, file: &FsPath, _: &Attributes) -> Result<VisitResult, FsError> {
            self.record(format!("file {}", file.as_path().display()))
        }

        fn visit_file_failed(
            &mut self,
            file: &FsPath,
            _: &FsError,
        ) -> Result<VisitResult, FsError> {
            self.record(format!("failed {}", file.as_path().display()))
        }
    }

    fn walk(fs: &MockFs, start: &str, visitor: &mut Recorder) -> Result<FsPath, FsError> {
        walk_file_tree(fs, &FsPath::new(start), WalkOptions::default(), visitor)
    }

    #[test]
    fn full_walk_visits_each_node_once_in_order() {
        let mut rec = Recorder::default();
        let end = walk(&MockFs::sample(), "/A", &mut rec).unwrap();
        assert_eq!(end.as_path(), Path::new("/A"));
        assert_eq!(
            rec.events,
            [
                "pre /A",
                "file /A/f1",
                "pre /A/B",
                "file /A/B/f2",
                "pre /A/B/C",
                "post /A/B/C",
                "post /A/B",
                "post /A",
            ]
        );
    }

    #[test]
    fn file_start_is_visited_as_file() {
        let mut rec = Recorder::default();
        walk(&MockFs::sample(), "/A/f1", &mut rec).unwrap();
        assert_eq!(rec.events, ["file /A/f1"]);
    }

    #[test]
    fn missing_start_reports_failure() {
        let mut rec = Recorder::default();
        walk(&MockFs::sample(), "/nope", &mut rec).unwrap();
        assert_eq!(rec.events, ["failed /nope"]);
    }

    #[test]
    fn node_failure_does_not_stop_siblings() {
        let fs = MockFs::new(vec![
            ("/r", Node::Dir(vec!["a", "bad", "z"])),
            ("/r/a", Node::File),
            ("/r/bad", Node::Broken),
            ("/r/z", Node::File),
        ]);
        let mut rec = Recorder::default();
        walk(&fs, "/r", &mut rec).unwrap();
        assert_eq!(
            rec.events,
            ["pre /r", "file /r/a", "failed /r/bad", "file /r/z", "post /r"]
        );
    }

    #[test]
    fn terminate_stops_everything() {
        let mut rec = Recorder::answering("file /A/B/f2", VisitResult::Terminate);
        walk(&MockFs::sample(), "/A", &mut rec).unwrap();
        assert_eq!(rec.events, ["pre /A", "file /A/f1", "pre /A/B", "file /A/B/f2"]);
    }

    #[test]
    fn terminate_from_pre_visit() {
        let mut rec = Recorder::answering("pre /A", VisitResult::Terminate);
        walk(&MockFs::sample(), "/A", &mut rec).unwrap();
        assert_eq!(rec.events, ["pre /A"]);
    }

    #[test]
    fn skip_subtree_skips_children_and_post_visit() {
        let mut rec = Recorder::answering("pre /A/B", VisitResult::SkipSubtree);
        walk(&MockFs::sample(), "/A", &mut rec).unwrap();
        assert_eq!(rec.events, ["pre /A", "file /A/f1", "pre /A/B", "post /A"]);
    }

    #[test]
    fn skip_siblings_from_file_keeps_parent_post_visit() {
        let mut rec = Recorder::answering("file /A/f1", VisitResult::SkipSiblings);
        walk(&MockFs::sample(), "/A", &mut rec).unwrap();
        assert_eq!(rec.events, ["pre /A", "file /A/f1", "post /A"]);
    }

    #[test]
    fn unlistable_directory_reaches_post_visit_with_error() {
        let fs = MockFs::new(vec![
            ("/r", Node::Dir(vec!["locked", "z"])),
            ("/r/locked", Node::Unlistable),
            ("/r/z", Node::File),
        ]);
        let mut rec = Recorder::default();
        walk(&fs, "/r", &mut rec).unwrap();
        assert_eq!(
            rec.events,
            [
                "pre /r",
                "pre /r/locked",
                "post /r/locked !",
                "file /r/z",
                "post /r",
            ]
        );
    }

    #[test]
    fn directory_cycle_is_reported_once() {
        let fs = MockFs::new(vec![
            ("/L", Node::Dir(vec!["self"])),
            ("/L/self", Node::Alias("/L")),
        ]);
        let mut seen = Vec::new();
        let mut visitor = visitor_fn(|event| {
            if let Visit::FileFailed(path, error) = event {
                assert!(matches!(error, FsError::FileSystemLoop { .. }));
                seen.push(path.clone());
            }
            Ok(VisitResult::Continue)
        });
        walk_file_tree(&fs, &FsPath::new("/L"), WalkOptions::default(), &mut visitor).unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].as_path(), Path::new("/L/self"));
    }

    #[test]
    fn max_depth_turns_directories_into_files() {
        let mut rec = Recorder::default();
        let options = WalkOptions { max_depth: 1 };
        walk_file_tree(&MockFs::sample(), &FsPath::new("/A"), options, &mut rec).unwrap();
        assert_eq!(rec.events, ["pre /A", "file /A/f1", "file /A/B", "post /A"]);
    }

    #[test]
    fn visitor_error_aborts_walk() {
        let mut visitor = visitor_fn(|event| match event {
            Visit::File(path, _) => Err(FsError::unsupported("visit", path.to_string())),
            _ => Ok(VisitResult::Continue),
        });
        let result = walk_file_tree(
            &MockFs::sample(),
            &FsPath::new("/A"),
            WalkOptions::default(),
            &mut visitor,
        );
        assert!(matches!(result, Err(FsError::Unsupported { .. })));
    }

    #[test]
    fn closure_visitor_sees_every_event() {
        let mut paths = Vec::new();
        let mut visitor = visitor_fn(|event| {
            paths.push(event.path().to_string());
            Ok(VisitResult::Continue)
        });
        walk_file_tree(
            &MockFs::sample(),
            &FsPath::new("/A"),
            WalkOptions::default(),
            &mut visitor,
        )
        .unwrap();
        assert_eq!(paths.len(), 8);
    }
}
