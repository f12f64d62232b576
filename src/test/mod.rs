mod experiment_plan;
mod lab_topology;
mod report_render;
