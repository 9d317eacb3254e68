service! {
    /// Status and results of long running tasks started by other services.
    TasksService => Tasks {
        fn get_task_status = "GetTaskStatus"(task_id: "taskId");
        fn get_task_result = "GetTaskResult"(task_id: "taskId");
    }
}
