use spacemap_core::{
    ErrorCode, ErrorHistogram, MountInfo, MountTable, ScanConfig, ScanError, TreeNode,
};
use std::fs;
use std::io;
use tempfile::TempDir;

#[test]
fn test_nested_directory_structure() {
    let mut root = TreeNode::directory(
        "/root",
        vec![
            TreeNode::directory("dir1", vec![TreeNode::leaf("file1.txt", 512)]),
            TreeNode::directory("dir2", vec![TreeNode::leaf("file2.txt", 1024)]),
        ],
    );
    root.descendant_mut(&[0]).unwrap().set_area(512);
    root.descendant_mut(&[1]).unwrap().set_area(1024);

    assert_eq!(root.num_children(), 2);
    assert_eq!(root.leaf_count(), 2);
    assert_eq!(root.dir_count(), 3);

    root.sort_children_descending();
    // dir2 should come first (contains larger file)
    assert_eq!(root.child_at(0).unwrap().name(), "dir2");
    assert_eq!(root.child_at(1).unwrap().name(), "dir1");
}

#[test]
fn test_node_json_keeps_empty_and_absent_children_apart() {
    let root = TreeNode::directory(
        "/r",
        vec![TreeNode::directory("empty", Vec::new()), TreeNode::new("denied")],
    );

    let json = serde_json::to_value(&root).unwrap();
    let children = json["children"].as_array().unwrap();
    assert_eq!(children[0]["children"], serde_json::json!([]));
    assert!(children[1].get("children").is_none());
    assert_eq!(children[1]["area"], 0);
}

#[test]
fn test_histogram_json_is_keyed_by_code() {
    let mut histogram = ErrorHistogram::new();
    histogram.record(&io::Error::from_raw_os_error(13));
    histogram.record(&io::Error::from_raw_os_error(13));

    let json = serde_json::to_value(&histogram).unwrap();
    assert_eq!(json["13"], 2);
    assert_eq!(histogram.iter().collect::<Vec<_>>(), vec![(ErrorCode(13), 2)]);
}

#[test]
fn test_read_mountinfo_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("mountinfo");
    fs::write(
        &path,
        "22 1 8:1 / / rw - ext4 /dev/sda1 rw\n\
         23 22 8:17 / /home rw - xfs /dev/sdb1 rw\n",
    )
    .unwrap();

    let mounts = MountTable::read_from(&path).unwrap();
    assert_eq!(mounts.len(), 2);
    assert_eq!(
        mounts.find_mount_for("/home/user/"),
        Some(&MountInfo::new("/home", "/dev/sdb1"))
    );
}

#[test]
fn test_read_mounts_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("mounts");
    fs::write(&path, "/dev/sda1 / ext4 rw 0 0\n/dev/sdc1 /mnt/usb vfat rw 0 0\n").unwrap();

    let mounts = MountTable::read_from(&path).unwrap();
    assert_eq!(mounts.find_mount_for("/mnt/usb/").unwrap().source, "/dev/sdc1");
    assert_eq!(mounts.find_mount_for("/etc/").unwrap().source, "/dev/sda1");
}

#[test]
fn test_missing_mount_table_is_fatal() {
    let temp = TempDir::new().unwrap();
    let err = MountTable::read_from(temp.path().join("absent")).unwrap_err();
    assert!(matches!(err, ScanError::MountTable { .. }));
}

#[test]
fn test_mount_table_from_iterator() {
    let mounts: MountTable = ["/", "/boot"]
        .into_iter()
        .map(|point| MountInfo::new(point, "disk0"))
        .collect();
    assert_eq!(mounts.len(), 2);
    assert!(!mounts.is_empty());
}

#[test]
fn test_scan_config_serde() {
    let config: ScanConfig = serde_json::from_str(r#"{ "root": "/srv" }"#).unwrap();
    assert_eq!(config.root.to_str().unwrap(), "/srv");
    assert!(config.canonicalize_root);
    assert_eq!(config.progress_interval, 256);
    assert!(config.mount_table.is_none());
}
