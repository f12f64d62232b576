//! 实验拓扑声明
//!
//! 拓扑结构（线性交换机链）：
//!
//! ```text
//! h1,h2 - s1 - s2 - s3 - s4 - h6,h7
//!              |    |
//!              h3   h4,h5
//! ```
//!
//! 选项 c 对交换机之间的链路做带宽/丢包整形，s2-s3 为瓶颈。
//! 这里只描述拓扑，由外部网络仿真器负责实际搭建。

use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};

use super::flows::ExperimentOption;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Host,
    Switch,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub name: String,
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
}

/// 链路整形参数（HTB 限速 + 随机丢包）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkShaping {
    pub bandwidth_mbps: u64,
    #[serde(default)]
    pub loss_percent: f64,
    pub max_queue_pkts: u64,
    pub use_htb: bool,
}

/// 双向链路
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkSpec {
    pub a: String,
    pub b: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shaping: Option<LinkShaping>,
}

impl LinkSpec {
    fn joins(&self, x: &str, y: &str) -> bool {
        (self.a == x && self.b == y) || (self.a == y && self.b == x)
    }
}

/// 沿一条路径的整形概况
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathProfile {
    pub hops: usize,
    /// 路径上最小的整形带宽；没有整形链路时为 `None`
    pub bottleneck_mbps: Option<u64>,
    /// 各链路丢包率复合后的端到端丢包率（百分比）
    pub loss_percent: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabTopology {
    pub nodes: Vec<NodeSpec>,
    pub links: Vec<LinkSpec>,
}

impl LabTopology {
    /// 添加主机节点；地址按添加顺序分配 10.0.0.N
    pub fn add_host(&mut self, name: impl Into<String>) -> String {
        let n = self.hosts().count() + 1;
        let name = name.into();
        self.nodes.push(NodeSpec {
            name: name.clone(),
            kind: NodeKind::Host,
            ip: Some(format!("10.0.0.{n}")),
        });
        name
    }

    pub fn add_switch(&mut self, name: impl Into<String>) -> String {
        let name = name.into();
        self.nodes.push(NodeSpec {
            name: name.clone(),
            kind: NodeKind::Switch,
            ip: None,
        });
        name
    }

    pub fn connect(&mut self, a: &str, b: &str) {
        self.connect_with(a, b, None);
    }

    pub fn connect_with(&mut self, a: &str, b: &str, shaping: Option<LinkShaping>) {
        self.links.push(LinkSpec {
            a: a.to_string(),
            b: b.to_string(),
            shaping,
        });
    }

    pub fn hosts(&self) -> impl Iterator<Item = &NodeSpec> {
        self.nodes.iter().filter(|n| n.kind == NodeKind::Host)
    }

    pub fn switches(&self) -> impl Iterator<Item = &NodeSpec> {
        self.nodes.iter().filter(|n| n.kind == NodeKind::Switch)
    }

    pub fn node(&self, name: &str) -> Option<&NodeSpec> {
        self.nodes.iter().find(|n| n.name == name)
    }

    pub fn host_ip(&self, name: &str) -> Option<&str> {
        self.node(name).and_then(|n| n.ip.as_deref())
    }

    pub fn link(&self, a: &str, b: &str) -> Option<&LinkSpec> {
        self.links.iter().find(|l| l.joins(a, b))
    }

    /// 最短跳数路径（BFS），包含首尾节点
    pub fn path(&self, src: &str, dst: &str) -> Option<Vec<String>> {
        self.node(src)?;
        self.node(dst)?;

        let mut adj: HashMap<&str, Vec<&str>> = HashMap::new();
        for l in &self.links {
            adj.entry(l.a.as_str()).or_default().push(l.b.as_str());
            adj.entry(l.b.as_str()).or_default().push(l.a.as_str());
        }

        let mut prev: HashMap<&str, &str> = HashMap::new();
        let mut q: VecDeque<&str> = VecDeque::new();
        q.push_back(src);
        prev.insert(src, src);
        while let Some(v) = q.pop_front() {
            if v == dst {
                break;
            }
            for &next in adj.get(v).map(Vec::as_slice).unwrap_or(&[]) {
                if !prev.contains_key(next) {
                    prev.insert(next, v);
                    q.push_back(next);
                }
            }
        }

        if !prev.contains_key(dst) {
            return None;
        }
        let mut path = vec![dst.to_string()];
        let mut cur = dst;
        while cur != src {
            cur = prev[cur];
            path.push(cur.to_string());
        }
        path.reverse();
        Some(path)
    }

    pub fn path_profile(&self, path: &[String]) -> PathProfile {
        let mut bottleneck_mbps: Option<u64> = None;
        let mut delivered = 1.0_f64;
        for pair in path.windows(2) {
            let Some(shaping) = self.link(&pair[0], &pair[1]).and_then(|l| l.shaping.as_ref())
            else {
                continue;
            };
            bottleneck_mbps = Some(match bottleneck_mbps {
                Some(b) => b.min(shaping.bandwidth_mbps),
                None => shaping.bandwidth_mbps,
            });
            delivered *= 1.0 - shaping.loss_percent / 100.0;
        }
        PathProfile {
            hops: path.len().saturating_sub(1),
            bottleneck_mbps,
            loss_percent: (1.0 - delivered) * 100.0,
        }
    }
}

/// 交换机链路的 HTB 队列长度（包）
pub const SHAPED_QUEUE_PKTS: u64 = 1000;

/// 构建实验拓扑
///
/// 选项 a/b 为不整形的基础拓扑；选项 c 为 s1-s2 100M、s2-s3 50M（带丢包）、s3-s4 100M。
pub fn build_lab_topology(option: ExperimentOption, loss_percent: f64) -> LabTopology {
    let mut topo = LabTopology::default();
    let hosts: Vec<String> = (1..=7).map(|i| topo.add_host(format!("h{i}"))).collect();
    let switches: Vec<String> = (1..=4).map(|i| topo.add_switch(format!("s{i}"))).collect();

    // 主机接入：h1,h2->s1; h3->s2; h4,h5->s3; h6,h7->s4
    let attach = [0usize, 0, 1, 2, 2, 3, 3];
    for (host, &sw) in hosts.iter().zip(attach.iter()) {
        topo.connect(host, &switches[sw]);
    }

    let shaped = |bandwidth_mbps: u64, loss_percent: f64| match option {
        ExperimentOption::C => Some(LinkShaping {
            bandwidth_mbps,
            loss_percent,
            max_queue_pkts: SHAPED_QUEUE_PKTS,
            use_htb: true,
        }),
        _ => None,
    };
    topo.connect_with(&switches[0], &switches[1], shaped(100, 0.0));
    topo.connect_with(&switches[1], &switches[2], shaped(50, loss_percent));
    topo.connect_with(&switches[2], &switches[3], shaped(100, 0.0));
    topo
}
