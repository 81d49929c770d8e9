//! Shared fixtures and the structural invariant checker.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};

use cattree::application::services::CategoryService;
use cattree::domain::{CategoryId, CategoryNode, NewCategory};

/// Ids of the three-level fixture `IT장비 / 컴퓨터 / 데스크톱`.
pub struct Seed {
    pub it: CategoryId,
    pub computer: CategoryId,
    pub desktop: CategoryId,
}

pub fn seeded_service() -> (CategoryService, Seed) {
    cattree::util::testing::init_test_setup();
    let service = CategoryService::default();
    let it = service
        .create(NewCategory::new("IT장비", "IT_EQUIPMENT"))
        .expect("create IT장비");
    let computer = service
        .create(NewCategory::new("컴퓨터", "COMPUTER").with_parent(it.id))
        .expect("create 컴퓨터");
    let desktop = service
        .create(NewCategory::new("데스크톱", "DESKTOP").with_parent(computer.id))
        .expect("create 데스크톱");
    (
        service,
        Seed {
            it: it.id,
            computer: computer.id,
            desktop: desktop.id,
        },
    )
}

/// A wider forest for structural tests:
///
/// ```text
/// IT장비 ─┬─ 컴퓨터 ─┬─ 데스크톱
///         │          └─ 노트북 ── 울트라북
///         └─ 주변기기 ── 모니터
/// 가구 ── 책상
/// ```
pub fn forest_service() -> (CategoryService, Vec<CategoryId>) {
    let (service, seed) = seeded_service();
    let notebook = create(&service, "노트북", "NOTEBOOK", Some(seed.computer));
    let ultra = create(&service, "울트라북", "ULTRABOOK", Some(notebook));
    let peripheral = create(&service, "주변기기", "PERIPHERAL", Some(seed.it));
    let monitor = create(&service, "모니터", "MONITOR", Some(peripheral));
    let furniture = create(&service, "가구", "FURNITURE", None);
    let desk = create(&service, "책상", "DESK", Some(furniture));
    let ids = vec![
        seed.it,
        seed.computer,
        seed.desktop,
        notebook,
        ultra,
        peripheral,
        monitor,
        furniture,
        desk,
    ];
    (service, ids)
}

pub fn create(
    service: &CategoryService,
    name: &str,
    code: &str,
    parent: Option<CategoryId>,
) -> CategoryId {
    let mut req = NewCategory::new(name, code);
    req.parent_id = parent;
    service.create(req).expect("create category").id
}

/// Checks every structural invariant on one consistent view of the forest.
pub fn assert_nodes_consistent(nodes: &[CategoryNode]) {
    let by_id: HashMap<CategoryId, &CategoryNode> = nodes.iter().map(|n| (n.id, n)).collect();
    assert_eq!(by_id.len(), nodes.len(), "duplicate ids");

    let mut codes = HashSet::new();
    for node in nodes {
        assert!(codes.insert(node.code.as_str()), "duplicate code {}", node.code);

        match node.parent_id {
            None => {
                assert_eq!(node.level, 1, "root {} level", node.id);
                assert_eq!(node.path, node.name, "root {} path", node.id);
            }
            Some(parent_id) => {
                let parent = by_id
                    .get(&parent_id)
                    .unwrap_or_else(|| panic!("{} has dangling parent {}", node.id, parent_id));
                assert_eq!(node.level, parent.level + 1, "level of {}", node.path);
                assert_eq!(
                    node.path,
                    format!("{}/{}", parent.path, node.name),
                    "path of {}",
                    node.id
                );
            }
        }

        // walking up must reach a root without revisiting anything
        let mut seen = HashSet::from([node.id]);
        let mut current = node.parent_id;
        while let Some(id) = current {
            assert!(seen.insert(id), "cycle through {}", id);
            current = by_id[&id].parent_id;
        }
    }
}

pub fn assert_forest_consistent(service: &CategoryService) {
    let nodes = service.list().expect("list");
    assert_nodes_consistent(&nodes);
    for node in &nodes {
        let ancestors = service.ancestors(node.id).expect("ancestors");
        assert!(ancestors.iter().all(|a| a.id != node.id));
        assert_eq!(ancestors.len() as u32, node.level - 1);
    }
}
