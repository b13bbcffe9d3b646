/// Import lines shown to the model as examples of correct categories
const IMPORT_EXAMPLES: &[&str] = &[
    "from diagrams import Cluster, Diagram",
    "from diagrams.aws.network import Route53, CloudFront, APIGateway",
    "from diagrams.aws.storage import S3",
    "from diagrams.aws.compute import Lambda",
    "from diagrams.aws.ml import Sagemaker, Bedrock",
    "from diagrams.aws.database import Dynamodb",
    "from diagrams.aws.management import Cloudwatch",
];

const RULES: &[&str] = &[
    "Create clusters for the different layers (for example Network Layer, Application Layer, Data Layer).",
    "Add every AWS service the description mentions or clearly implies.",
    "Connect services with the >> operator and wrap grouped nodes in parentheses.",
    "Configure the Diagram explicitly (direction, filename, show=False).",
    "Never connect a Cluster object to another Cluster.",
    "Use the - operator only when an undirected link is explicitly required.",
    "Remove duplicate links unless a duplicate is explicitly required.",
];

/// Instruction prompt asking for a complete `diagrams` script
pub fn build_prompt(description: &str) -> String {
    let mut prompt = String::new();
    prompt.push_str("I need an AWS architecture diagram built with the Python Diagrams package.\n\n");
    prompt.push_str("Architecture description:\n\n");
    prompt.push_str(description.trim());
    prompt.push_str("\n\nWrite a complete Python script that draws this architecture. The script must:\n\n");
    prompt.push_str(
        "1. Import every component it uses from the right Diagrams module. Spelling matters: \
         Dynamodb (not DynamoDB), Cloudwatch (not CloudWatch), Sagemaker (not SageMaker), \
         and APIGateway comes from diagrams.aws.network. For example:\n",
    );
    for line in IMPORT_EXAMPLES {
        prompt.push_str("   ");
        prompt.push_str(line);
        prompt.push('\n');
    }
    for (i, rule) in RULES.iter().enumerate() {
        prompt.push_str(&format!("{}. {rule}\n", i + 2));
    }
    prompt.push_str(
        "\nReturn one runnable Python script in a ```python code block that produces a clear, \
         professional AWS architecture diagram as a PNG file.\n",
    );
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_description_and_rules() {
        let prompt = build_prompt("  An ALB in front of two EC2 instances and an RDS database.\n");
        assert!(prompt.contains("\n\nAn ALB in front of two EC2 instances and an RDS database.\n\n"));
        assert!(prompt.contains("from diagrams.aws.network import Route53, CloudFront, APIGateway"));
        assert!(prompt.contains("2. Create clusters"));
        assert!(prompt.contains("8. Remove duplicate links"));
    }
}
