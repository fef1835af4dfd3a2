pub mod animation_bone_mask;
pub mod animation_clip;
pub mod animation_editor_flow_graph;
pub mod animation_editor_graph_compilation;
pub mod animation_editor_graph_definition;
pub mod animation_event;
pub mod animation_frame_time;
pub mod animation_graph_component;
pub mod animation_graph_context;
pub mod animation_graph_resources;
pub mod animation_sync_track;
pub mod animation_task;
pub mod animation_task_pose_pool;
pub mod animation_task_system;
pub mod graph_instance;
pub mod graph_nodes;
pub mod node_animation_clip;

// pub use animation_bone_mask::*;
